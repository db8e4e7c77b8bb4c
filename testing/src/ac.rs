use evsac::platform::{
    Builder,
    Platform,
};
use evscore::ac::{
    role::Role,
    user::UserToken,
};
use crate::{
    fixture,
    sqlite::create_seeded_backend,
};

/// A platform with the default policy over a seeded in-memory backend.
pub async fn create_sqlite_platform() -> anyhow::Result<Platform> {
    let platform = Builder::new()
        .storage_platform(create_seeded_backend().await?)
        .build()
        .await?;
    Ok(platform)
}

/// The token of a fixture user; unknown users get no role.
pub fn token(id: &str) -> UserToken {
    let role = fixture::users()
        .into_iter()
        .find_map(|(name, role)| (name == id).then_some(role))
        .unwrap_or(Role::Undefined);
    fixture::user(id, role)
}

#[cfg(test)]
mod tests {
    use evscore::platform::PlatformUrl;
    use super::*;

    #[async_std::test]
    async fn smoke_test_create_platform() -> anyhow::Result<()> {
        let platform = create_sqlite_platform().await?;
        assert_eq!(platform.storage().url(), "sqlite::memory:");
        assert_eq!(token("u4").role, Role::SiteAdmin);
        Ok(())
    }
}
