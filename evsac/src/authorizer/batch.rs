use std::collections::BTreeSet;
use evscore::{
    ac::{
        Action,
        traits::SiteUserRole,
    },
    entity::{
        ChargingStation,
        Entity,
        Site,
        SiteArea,
        User,
    },
    filter::{
        Filter,
        Pagination,
        Projection,
    },
};

use crate::{
    authorized::Authorized,
    error::AccessError,
};

use super::{
    *,
    impls::{
        doc_id,
        from_document,
    },
};

impl Authorizer {
    /// Fetch every entity identified by `ids` if the action is permitted
    /// on all of them.  A single entity outside of the caller's reach
    /// rejects the whole batch.
    pub async fn check_batch_authorization<T: Entity>(
        &self,
        ids: &[String],
        action: Action,
    ) -> Result<Vec<T>, AccessError> {
        if ids.is_empty() || ids.iter().any(String::is_empty) {
            return Err(AccessError::Validation { field: "ids" });
        }
        let resource = T::RESOURCE;
        let auth = self.evaluate_cached(resource, action).await?;
        if !auth.authorized {
            return Err(self.denial(resource, action, None));
        }

        let requested = ids.iter()
            .map(String::as_str)
            .collect::<BTreeSet<_>>();
        let filter = Filter::new()
            .is_in("id", requested.iter().copied())
            .and(auth.filters.clone());
        let docs = self.tenant.find_documents(
            resource,
            &filter,
            &Projection::all(),
            &Pagination::default(),
        ).await?
            .into_iter()
            .filter(|doc| auth.asserts_pass(doc))
            .collect::<Vec<_>>();

        let found = docs.iter()
            .filter_map(doc_id)
            .collect::<BTreeSet<_>>();
        if found.len() != requested.len()
            || found.iter().any(|id| !requested.contains(id.as_str()))
        {
            log::warn!(
                "batch {action} on {resource}: {} of {} requested entities permitted",
                found.len(),
                requested.len(),
            );
            return Err(self.denial(resource, action, None));
        }
        docs.into_iter()
            .map(from_document)
            .collect()
    }

    /// The site the users are to be assigned to or unassigned from,
    /// together with the users, each of which the caller must be able
    /// to see.
    pub async fn check_site_users_authorization(
        &self,
        site_id: &str,
        action: Action,
        user_ids: &[String],
    ) -> Result<(Authorized<Site>, Vec<User>), AccessError> {
        let site = self.check_and_get_site_authorization(
            site_id,
            action,
            &GateOptions::default(),
        ).await?;
        let users = self.check_batch_authorization::<User>(user_ids, Action::List).await?;
        Ok((site, users))
    }

    pub async fn check_user_sites_authorization(
        &self,
        user_id: &str,
        action: Action,
        site_ids: &[String],
    ) -> Result<(Authorized<User>, Vec<Site>), AccessError> {
        let user = self.check_and_get_user_authorization(
            user_id,
            Action::Read,
            &GateOptions::default(),
        ).await?;
        let sites = self.check_batch_authorization::<Site>(site_ids, action).await?;
        Ok((user, sites))
    }

    /// Moving charging stations into or out of a site area requires the
    /// action on the site area and update rights on every station.
    pub async fn check_site_area_charging_stations_authorization(
        &self,
        site_area_id: &str,
        action: Action,
        station_ids: &[String],
    ) -> Result<(Authorized<SiteArea>, Vec<ChargingStation>), AccessError> {
        let site_area = self.check_and_get_site_area_authorization(
            site_area_id,
            action,
            &GateOptions::default(),
        ).await?;
        let stations = self.check_batch_authorization::<ChargingStation>(
            station_ids,
            Action::Update,
        ).await?;
        Ok((site_area, stations))
    }

    pub async fn assign_site_users(
        &self,
        site_id: &str,
        user_ids: &[String],
        role: SiteUserRole,
    ) -> Result<(), AccessError> {
        self.check_site_users_authorization(site_id, Action::Assign, user_ids).await?;
        for user_id in user_ids {
            self.tenant.assign_site_user(site_id, user_id, role).await?;
        }
        log::info!(
            "user {} assigned {} user(s) to site {site_id}",
            self.user.id,
            user_ids.len(),
        );
        Ok(())
    }

    pub async fn unassign_site_users(
        &self,
        site_id: &str,
        user_ids: &[String],
    ) -> Result<(), AccessError> {
        self.check_site_users_authorization(site_id, Action::Unassign, user_ids).await?;
        for user_id in user_ids {
            self.tenant.unassign_site_user(site_id, user_id).await?;
        }
        log::info!(
            "user {} unassigned {} user(s) from site {site_id}",
            self.user.id,
            user_ids.len(),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use std::sync::Arc;
    use evscore::ac::{
        Resource,
        role::Role,
        user::UserToken,
    };
    use evsrbac::{
        AuthorizationEngine,
        PolicyDefinition,
    };
    use test_evs::{
        core::MockTenant,
        fixture::doc,
    };
    use super::*;

    fn authorizer(tenant: MockTenant, id: &str, role: Role) -> Authorizer {
        Authorizer::new(
            Arc::new(AuthorizationEngine::new(PolicyDefinition::default(), None)),
            Arc::new(tenant),
            UserToken::new(id, "t1", role),
        )
    }

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[async_std::test]
    async fn duplicated_ids_count_once() -> anyhow::Result<()> {
        let mut tenant = MockTenant::new();
        tenant.expect_find_documents()
            .times(1)
            .withf(|resource, _, _, _| *resource == Resource::Site)
            .returning(|_, _, _, _| Ok(vec![
                doc(json!({"id": "s1", "issuer": true})),
                doc(json!({"id": "s2", "issuer": true})),
            ]));
        let authorizer = authorizer(tenant, "admin", Role::Admin);
        let sites = authorizer.check_batch_authorization::<Site>(
            &ids(&["s1", "s2", "s1"]),
            Action::Read,
        ).await?;
        assert_eq!(sites.len(), 2);
        Ok(())
    }

    #[async_std::test]
    async fn missing_entity_rejects_batch() {
        let mut tenant = MockTenant::new();
        tenant.expect_find_documents()
            .times(1)
            .returning(|_, _, _, _| Ok(vec![
                doc(json!({"id": "s1", "issuer": true})),
            ]));
        let authorizer = authorizer(tenant, "admin", Role::Admin);
        let result = authorizer.check_batch_authorization::<Site>(
            &ids(&["s1", "s9"]),
            Action::Read,
        ).await;
        assert!(matches!(result, Err(AccessError::Forbidden(_))));
    }

    #[async_std::test]
    async fn assert_failure_rejects_batch() {
        let mut tenant = MockTenant::new();
        tenant.expect_find_documents()
            .times(1)
            .returning(|_, _, _, _| Ok(vec![
                doc(json!({"id": "car1", "userID": "u1"})),
                doc(json!({"id": "car2", "userID": "u2"})),
            ]));
        let authorizer = authorizer(tenant, "u1", Role::Basic);
        let result = authorizer.check_batch_authorization::<evscore::entity::Car>(
            &ids(&["car1", "car2"]),
            Action::Update,
        ).await;
        assert!(matches!(result, Err(AccessError::Forbidden(_))));
    }

    #[async_std::test]
    async fn no_grant_skips_storage() {
        let authorizer = authorizer(MockTenant::new(), "demo", Role::Demo);
        let result = authorizer.check_batch_authorization::<ChargingStation>(
            &ids(&["cs1"]),
            Action::Update,
        ).await;
        assert!(matches!(result, Err(AccessError::Forbidden(_))));
    }
}
