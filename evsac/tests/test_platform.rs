use evscore::{
    ac::{
        Action,
        Resource,
        role::Role,
        traits::SiteUserRole,
        user::UserToken,
    },
    entity::{
        Car,
        CarType,
        ChargingStation,
        Site,
        SiteArea,
        Tag,
    },
    filter::{
        Filter,
        Pagination,
    },
};
use evsac::{
    GateOptions,
    error::AccessError,
};
use evsrbac::AuthorizationContext;

use test_evs::ac::{
    create_sqlite_platform,
    token,
};

fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[async_std::test]
async fn tenants_are_isolated() -> anyhow::Result<()> {
    let platform = create_sqlite_platform().await?;
    let local = platform.authorizer(token("admin"));
    local.check_and_get_site_authorization("s1", Action::Read, &GateOptions::default()).await?;

    let foreign = platform.authorizer(UserToken::new("admin", "t2", Role::Admin));
    assert!(matches!(
        foreign.check_and_get_site_authorization("s1", Action::Read, &GateOptions::default()).await,
        Err(AccessError::NotFound),
    ));
    assert!(foreign.list::<Site>(Filter::new(), &Pagination::default()).await?.is_empty());
    Ok(())
}

#[async_std::test]
async fn site_admin_limited_to_administered_sites() -> anyhow::Result<()> {
    let platform = create_sqlite_platform().await?;
    let authorizer = platform.authorizer(token("u4"));

    let site_area = authorizer.check_and_get_site_area_authorization(
        "sa1",
        Action::Update,
        &GateOptions::default(),
    ).await?;
    assert_eq!(site_area.site_id.as_deref(), Some("s1"));
    assert!(site_area.can(Action::Update));
    assert!(site_area.can(Action::Read));

    let err = authorizer.check_and_get_site_area_authorization(
        "sa2",
        Action::Update,
        &GateOptions::default(),
    ).await
        .expect_err("sa2 is not under a site administered by u4");
    assert!(err.is_forbidden());
    assert_eq!(err.to_string(), "forbidden");
    match err {
        AccessError::Forbidden(denial) => {
            assert_eq!(denial.user_id, "u4");
            assert_eq!(denial.resource, Resource::SiteArea);
            assert_eq!(denial.action, Action::Update);
            assert_eq!(denial.id.as_deref(), Some("sa2"));
        }
        _ => unreachable!(),
    }
    Ok(())
}

#[async_std::test]
async fn basic_user_reads_own_profile() -> anyhow::Result<()> {
    let platform = create_sqlite_platform().await?;
    let authorizer = platform.authorizer(token("u1"));

    let user = authorizer.check_and_get_user_authorization(
        "u1",
        Action::Read,
        &GateOptions::default(),
    ).await?;
    assert_eq!(user.id, "u1");
    assert!(user.can(Action::Read));
    assert!(user.can(Action::Update));
    assert!(!user.can(Action::Delete));

    let value = serde_json::to_value(&user)?;
    assert_eq!(value["canRead"], true);
    assert_eq!(value["canDelete"], false);
    assert_eq!(value["email"], "u1@example.com");

    assert!(authorizer.check_and_get_user_authorization(
        "u2",
        Action::Read,
        &GateOptions::default(),
    ).await.is_err_and(|e| e.is_forbidden()));
    Ok(())
}

#[async_std::test]
async fn external_entities_refused_when_checked() -> anyhow::Result<()> {
    let platform = create_sqlite_platform().await?;
    let admin = platform.authorizer(token("admin"));

    assert!(matches!(
        admin.check_and_get_charging_station_authorization(
            "cs4",
            Action::Read,
            &GateOptions::default(),
        ).await,
        Err(AccessError::ExternalEntity),
    ));
    assert!(matches!(
        admin.check_and_get_charging_station_authorization(
            "cs4",
            Action::Update,
            &GateOptions::default(),
        ).await,
        Err(AccessError::ExternalEntity),
    ));

    let station = admin.check_and_get_charging_station_authorization(
        "cs4",
        Action::Read,
        &GateOptions::default().check_issuer(false),
    ).await?;
    assert!(!station.issuer);
    assert!(station.can(Action::Read));
    assert!(!station.can(Action::Update));

    // external regardless of the caller's reach
    let u1 = platform.authorizer(token("u1"));
    assert!(matches!(
        u1.check_and_get_site_area_authorization(
            "sa3",
            Action::Read,
            &GateOptions::default(),
        ).await,
        Err(AccessError::ExternalEntity),
    ));
    assert!(u1.check_and_get_site_area_authorization(
        "sa3",
        Action::Read,
        &GateOptions::default().check_issuer(false),
    ).await.is_err_and(|e| e.is_forbidden()));

    // a site admin reaching the external site area of an administered site
    let u4 = platform.authorizer(token("u4"));
    assert!(matches!(
        u4.check_and_get_site_area_authorization(
            "sa3",
            Action::Update,
            &GateOptions::default(),
        ).await,
        Err(AccessError::ExternalEntity),
    ));
    Ok(())
}

#[async_std::test]
async fn not_found_and_forbidden() -> anyhow::Result<()> {
    let platform = create_sqlite_platform().await?;

    let admin = platform.authorizer(token("admin"));
    assert!(matches!(
        admin.check_and_get_site_authorization("s9", Action::Read, &GateOptions::default()).await,
        Err(AccessError::NotFound),
    ));

    let u1 = platform.authorizer(token("u1"));
    assert!(u1.check_and_get_site_authorization(
        "s9",
        Action::Read,
        &GateOptions::default(),
    ).await.is_err_and(|e| e.is_forbidden()));
    assert!(u1.check_and_get_site_authorization(
        "s2",
        Action::Read,
        &GateOptions::default(),
    ).await.is_err_and(|e| e.is_forbidden()));

    let demo = platform.authorizer(token("demo"));
    assert!(demo.check_and_get_charging_station_authorization(
        "cs1",
        Action::Reset,
        &GateOptions::default(),
    ).await.is_err_and(|e| e.is_forbidden()));
    assert!(demo.data_sources().fetched().is_empty());

    let nobody = platform.authorizer(token("nobody"));
    assert!(nobody.check_and_get_site_authorization(
        "s1",
        Action::Read,
        &GateOptions::default(),
    ).await.is_err_and(|e| e.is_forbidden()));
    Ok(())
}

#[async_std::test]
async fn filters_only_narrow() -> anyhow::Result<()> {
    let platform = create_sqlite_platform().await?;
    let u1 = platform.authorizer(token("u1"));

    let sites = u1.list::<Site>(Filter::new(), &Pagination::default()).await?;
    assert_eq!(sites.iter().map(|s| s.id.as_str()).collect::<Vec<_>>(), ["s1"]);

    let sites = u1.list::<Site>(
        Filter::new().is_in("id", ["s1", "s2", "s3"]),
        &Pagination::default(),
    ).await?;
    assert_eq!(sites.len(), 1);

    let sites = u1.list::<Site>(
        Filter::new().eq("companyID", "c2"),
        &Pagination::default(),
    ).await?;
    assert!(sites.is_empty());

    assert!(u1.check_and_get_site_authorization(
        "s1",
        Action::Read,
        &GateOptions::default()
            .additional_filters(Filter::new().eq("companyID", "c2")),
    ).await.is_err_and(|e| e.is_forbidden()));
    Ok(())
}

#[async_std::test]
async fn list_annotates_each_row() -> anyhow::Result<()> {
    let platform = create_sqlite_platform().await?;
    let u4 = platform.authorizer(token("u4"));

    let stations = u4.list::<ChargingStation>(Filter::new(), &Pagination::default()).await?;
    let flags = stations.iter()
        .map(|s| (s.id.as_str(), s.can(Action::Reset)))
        .collect::<Vec<_>>();
    assert_eq!(flags, [("cs1", true), ("cs2", true), ("cs4", false)]);
    // projected to the attributes of the grant
    assert!(stations.iter().all(|s| s.site_id.is_some()));

    let page = u4.list::<ChargingStation>(Filter::new(), &Pagination::new(1, Some(1))).await?;
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id, "cs2");
    Ok(())
}

#[async_std::test]
async fn pool_cars_shared_within_sites() -> anyhow::Result<()> {
    let platform = create_sqlite_platform().await?;
    let u1 = platform.authorizer(token("u1"));

    let car = u1.check_and_get_car_authorization("car2", Action::Read, &GateOptions::default()).await?;
    assert_eq!(car.user_id.as_deref(), Some("u2"));
    assert!(car.can(Action::Read));
    assert!(!car.can(Action::Update));

    u1.check_and_get_car_authorization("car1", Action::Update, &GateOptions::default()).await?;
    assert!(u1.check_and_get_car_authorization(
        "car3",
        Action::Read,
        &GateOptions::default(),
    ).await.is_err_and(|e| e.is_forbidden()));
    assert!(u1.check_and_get_car_authorization(
        "car2",
        Action::Update,
        &GateOptions::default(),
    ).await.is_err_and(|e| e.is_forbidden()));

    let catalog = u1.check_and_get_car_catalog_authorization(
        "1001",
        Action::Read,
        &GateOptions::default(),
    ).await?;
    assert_eq!(catalog.vehicle_make, "Tesla");

    // listed as they are read: owned or pooled within an assigned site
    let cars = u1.list::<Car>(Filter::new(), &Pagination::default()).await?;
    let flags = cars.iter()
        .map(|c| (c.id.as_str(), c.can(Action::Update)))
        .collect::<Vec<_>>();
    assert_eq!(flags, [("car1", true), ("car2", false)]);
    Ok(())
}

#[async_std::test]
async fn batch_is_all_or_nothing() -> anyhow::Result<()> {
    let platform = create_sqlite_platform().await?;
    let u4 = platform.authorizer(token("u4"));

    assert!(u4.check_site_users_authorization(
        "s1",
        Action::Assign,
        &ids(&["u1", "u2", "u3"]),
    ).await.is_err_and(|e| e.is_forbidden()));

    let (site, users) = u4.check_site_users_authorization(
        "s1",
        Action::Assign,
        &ids(&["u1", "u2"]),
    ).await?;
    assert_eq!(site.id, "s1");
    assert!(site.can(Action::Assign));
    assert_eq!(users.len(), 2);

    // s3 is external, s2 is not administered
    assert!(u4.check_user_sites_authorization(
        "u1",
        Action::Update,
        &ids(&["s1", "s3"]),
    ).await.is_err_and(|e| e.is_forbidden()));
    assert!(u4.check_user_sites_authorization(
        "u1",
        Action::Update,
        &ids(&["s1", "s2"]),
    ).await.is_err_and(|e| e.is_forbidden()));
    let (user, sites) = u4.check_user_sites_authorization(
        "u1",
        Action::Update,
        &ids(&["s1"]),
    ).await?;
    assert_eq!(user.id, "u1");
    assert_eq!(sites.len(), 1);

    let (site_area, stations) = u4.check_site_area_charging_stations_authorization(
        "sa1",
        Action::Assign,
        &ids(&["cs1", "cs2"]),
    ).await?;
    assert_eq!(site_area.id, "sa1");
    assert_eq!(stations.len(), 2);
    assert!(u4.check_site_area_charging_stations_authorization(
        "sa1",
        Action::Assign,
        &ids(&["cs1", "cs3"]),
    ).await.is_err_and(|e| e.is_forbidden()));
    Ok(())
}

#[async_std::test]
async fn assignment_changes_reach() -> anyhow::Result<()> {
    let platform = create_sqlite_platform().await?;

    let u1 = platform.authorizer(token("u1"));
    assert!(u1.assign_site_users(
        "s1",
        &ids(&["u1"]),
        SiteUserRole::default(),
    ).await.is_err_and(|e| e.is_forbidden()));

    let u4 = platform.authorizer(token("u4"));
    u4.unassign_site_users("s1", &ids(&["u2"])).await?;

    // a fresh request sees the change; no assigned site denies outright
    let u2 = platform.authorizer(token("u2"));
    assert!(u2.list::<Site>(
        Filter::new(),
        &Pagination::default(),
    ).await.is_err_and(|e| e.is_forbidden()));

    let u4 = platform.authorizer(token("u4"));
    assert!(u4.check_site_users_authorization(
        "s1",
        Action::Assign,
        &ids(&["u2"]),
    ).await.is_err_and(|e| e.is_forbidden()));
    Ok(())
}

#[async_std::test]
async fn create_update_delete() -> anyhow::Result<()> {
    let platform = create_sqlite_platform().await?;
    let u4 = platform.authorizer(token("u4"));

    let area = SiteArea {
        id: "sa4".into(),
        name: "Area 4".into(),
        site_id: Some("s1".into()),
        issuer: true,
        ..Default::default()
    };
    u4.create(&area, &AuthorizationContext::for_site("s1")).await?;
    assert!(u4.create(
        &SiteArea { id: "sa5".into(), site_id: Some("s2".into()), issuer: true, ..Default::default() },
        &AuthorizationContext::for_site("s2"),
    ).await.is_err_and(|e| e.is_forbidden()));

    let moved = SiteArea { site_id: Some("s2".into()), ..area.clone() };
    assert!(u4.update(&moved).await.is_err_and(|e| e.is_forbidden()));
    let renamed = SiteArea { name: "Renamed".into(), ..area };
    u4.update(&renamed).await?;

    u4.delete::<ChargingStation>("cs1").await?;
    let admin = platform.authorizer(token("admin"));
    assert!(matches!(
        admin.check_and_get_charging_station_authorization("cs1", Action::Read, &GateOptions::default()).await,
        Err(AccessError::NotFound),
    ));
    let area = admin.check_and_get_site_area_authorization("sa4", Action::Read, &GateOptions::default()).await?;
    assert_eq!(area.name, "Renamed");

    let u1 = platform.authorizer(token("u1"));
    let tag = u1.check_and_get_tag_authorization("tag1", Action::Update, &GateOptions::default()).await?;
    u1.update(&Tag { description: Some("mine".into()), ..tag.into_inner() }).await?;
    assert!(u1.delete::<Tag>("tag1").await.is_err_and(|e| e.is_forbidden()));
    Ok(())
}

#[async_std::test]
async fn create_never_replaces() -> anyhow::Result<()> {
    let platform = create_sqlite_platform().await?;

    // another user's car, claimed through create
    let u1 = platform.authorizer(token("u1"));
    let err = u1.create(
        &Car { id: "car2".into(), user_id: Some("u1".into()), ..Default::default() },
        &AuthorizationContext::default(),
    ).await
        .expect_err("car2 already exists");
    assert!(matches!(err, AccessError::AlreadyExists { field: "id" }));

    // a site area under s2 moved into an administered site
    let u4 = platform.authorizer(token("u4"));
    assert!(matches!(
        u4.create(
            &SiteArea {
                id: "sa2".into(),
                site_id: Some("s1".into()),
                issuer: true,
                ..Default::default()
            },
            &AuthorizationContext::for_site("s1"),
        ).await,
        Err(AccessError::AlreadyExists { .. }),
    ));

    // an external site turned local
    let admin = platform.authorizer(token("admin"));
    assert!(matches!(
        admin.create(
            &Site { id: "s3".into(), issuer: true, ..Default::default() },
            &AuthorizationContext::default(),
        ).await,
        Err(AccessError::AlreadyExists { .. }),
    ));

    // nothing was written
    let car = admin.check_and_get_car_authorization("car2", Action::Read, &GateOptions::default()).await?;
    assert_eq!(car.user_id.as_deref(), Some("u2"));
    let area = admin.check_and_get_site_area_authorization("sa2", Action::Read, &GateOptions::default()).await?;
    assert_eq!(area.site_id.as_deref(), Some("s2"));
    let site = admin.check_and_get_site_authorization(
        "s3",
        Action::Read,
        &GateOptions::default().check_issuer(false),
    ).await?;
    assert!(!site.issuer);
    Ok(())
}

#[async_std::test]
async fn cars_created_for_self_only() -> anyhow::Result<()> {
    let platform = create_sqlite_platform().await?;
    let u1 = platform.authorizer(token("u1"));

    assert!(u1.create(
        &Car { id: "car4".into(), user_id: Some("u2".into()), ..Default::default() },
        &AuthorizationContext::default(),
    ).await.is_err_and(|e| e.is_forbidden()));
    assert!(u1.create(
        &Car {
            id: "car5".into(),
            user_id: Some("u3".into()),
            car_type: CarType::PoolCar,
            site_ids: vec!["s2".into()],
            ..Default::default()
        },
        &AuthorizationContext::default(),
    ).await.is_err_and(|e| e.is_forbidden()));

    u1.create(
        &Car { id: "car6".into(), user_id: Some("u1".into()), ..Default::default() },
        &AuthorizationContext::default(),
    ).await?;
    let car = u1.check_and_get_car_authorization("car6", Action::Update, &GateOptions::default()).await?;
    assert!(car.can(Action::Delete));

    let admin = platform.authorizer(token("admin"));
    assert!(matches!(
        admin.check_and_get_car_authorization("car4", Action::Read, &GateOptions::default()).await,
        Err(AccessError::NotFound),
    ));
    Ok(())
}

#[async_std::test]
async fn registration_tokens_for_site_admins() -> anyhow::Result<()> {
    let platform = create_sqlite_platform().await?;
    let u4 = platform.authorizer(token("u4"));
    let rt = u4.check_and_get_registration_token_authorization(
        "rt1",
        Action::Read,
        &GateOptions::default(),
    ).await?;
    assert_eq!(rt.site_area_id.as_deref(), Some("sa1"));
    assert!(u4.check_and_get_registration_token_authorization(
        "rt2",
        Action::Read,
        &GateOptions::default(),
    ).await.is_err_and(|e| e.is_forbidden()));
    Ok(())
}

#[async_std::test]
async fn data_sources_shared_across_checks() -> anyhow::Result<()> {
    let platform = create_sqlite_platform().await?;
    let u1 = platform.authorizer(token("u1"));
    for _ in 0..10 {
        u1.check_and_get_company_authorization("c1", Action::Read, &GateOptions::default()).await?;
        u1.check_and_get_site_authorization("s1", Action::Read, &GateOptions::default()).await?;
    }
    assert_eq!(u1.data_sources().fetched().len(), 2);
    Ok(())
}
