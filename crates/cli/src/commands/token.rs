//! Access token commands.
//!
//! The token is issued by the backend login flow; these commands only store
//! or forget it.

use secrecy::SecretString;

use super::{CliError, open_session};

pub fn set(token: String) -> Result<(), CliError> {
    let session = open_session()?;
    session
        .tokens()
        .set_access_token(&SecretString::from(token))?;
    tracing::info!("Access token stored");
    Ok(())
}

pub fn clear() -> Result<(), CliError> {
    let session = open_session()?;
    session.tokens().clear()?;
    tracing::info!("Access token removed");
    Ok(())
}
