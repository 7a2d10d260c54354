use actstate::NamedError;
use std::time::Duration;
use tokio::time::sleep;

pub const LOAD_DELAY: u64 = 50;

#[derive(Clone, Debug, PartialEq)]
pub struct User {
    pub id: u64,
    pub name: String,
}

pub async fn load_user(id: u64) -> Result<User, NamedError> {
    sleep(Duration::from_millis(LOAD_DELAY)).await;
    if id == 0 {
        return Err(NamedError::new("NOT_FOUND", "user 0 does not exist"));
    }
    Ok(User {
        id,
        name: format!("user-{id}"),
    })
}

pub fn validate_then_load(
    id: u64,
) -> Result<impl std::future::Future<Output = Result<User, NamedError>>, NamedError> {
    if id > 1000 {
        return Err(NamedError::new("INVALID_ID", format!("id {id} is out of range")));
    }
    Ok(load_user(id))
}
