pub mod server;

use crate::cli::globals::RemoteService;

/// Actions the CLI can dispatch to.
#[derive(Debug)]
pub enum Action {
    Server {
        port: u16,
        dsn: String,
        identity: RemoteService,
        assets: RemoteService,
        frontend_url: String,
    },
}
