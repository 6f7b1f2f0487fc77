//! Multipart form parsing for workspace create/update.

use axum::extract::Multipart;

use crate::api::error::ApiError;

use super::IMAGE_REMOVE_SENTINEL;

/// Parsed `name` + `image` form fields.
#[derive(Debug, Default)]
pub(super) struct WorkspaceForm {
    pub name: Option<String>,
    pub image: Option<ImageField>,
}

#[derive(Debug)]
pub(super) enum ImageField {
    /// A file part: upload it and store the resulting URL.
    Upload { filename: String, bytes: Vec<u8> },
    /// The removal sentinel: delete the current asset and clear the URL.
    Remove,
}

/// Read the multipart stream into a [`WorkspaceForm`].
///
/// Unknown fields are ignored. An `image` text value equal to the removal
/// sentinel clears the image; an empty text value means "no change" (browser
/// forms submit the field even when untouched); any other text is rejected.
pub(super) async fn parse_workspace_form(
    multipart: &mut Multipart,
) -> Result<WorkspaceForm, ApiError> {
    let mut form = WorkspaceForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::BusinessRule("Invalid form payload"))?
    {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("name") => {
                let value = field
                    .text()
                    .await
                    .map_err(|_| ApiError::BusinessRule("Invalid form payload"))?;
                form.name = Some(value);
            }
            Some("image") => {
                let filename = field.file_name().map(str::to_string);
                match filename {
                    Some(filename) => {
                        let bytes = field
                            .bytes()
                            .await
                            .map_err(|_| ApiError::BusinessRule("Invalid form payload"))?
                            .to_vec();
                        form.image = Some(ImageField::Upload { filename, bytes });
                    }
                    None => {
                        let value = field
                            .text()
                            .await
                            .map_err(|_| ApiError::BusinessRule("Invalid form payload"))?;
                        if value == IMAGE_REMOVE_SENTINEL {
                            form.image = Some(ImageField::Remove);
                        } else if !value.is_empty() {
                            return Err(ApiError::BusinessRule("Invalid image field"));
                        }
                    }
                }
            }
            _ => {}
        }
    }

    Ok(form)
}
