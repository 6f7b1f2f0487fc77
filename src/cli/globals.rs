use secrecy::SecretString;

/// Connection details for an external collaborator service (identity
/// provider, asset CDN). The token never appears in debug output.
#[derive(Debug, Clone)]
pub struct RemoteService {
    pub url: String,
    pub token: SecretString,
}

impl RemoteService {
    #[must_use]
    pub fn new(url: String, token: SecretString) -> Self {
        Self { url, token }
    }
}
