//! Integration tests for the repository implementations using
//! in-memory SurrealDB.

use campus_core::error::CampusError;
use campus_core::models::principal::{CreatePrincipal, Role};
use campus_core::models::resource::{CreateResource, ResourceKind};
use campus_core::models::tenant::{CreateTenant, SubscriptionTier, Tenant, TierChange, UsageLimit};
use campus_core::repository::{
    EnrollmentRepository, PrincipalRepository, ResourceRepository, TenantRepository,
};
use campus_db::repository::{
    SurrealEnrollmentRepository, SurrealPrincipalRepository, SurrealResourceRepository,
    SurrealTenantRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

/// Helper: spin up in-memory DB and run migrations.
async fn setup() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    campus_db::run_migrations(&db).await.unwrap();
    db
}

async fn create_tenant(db: &Surreal<Db>, code: &str, subdomain: &str) -> Tenant {
    SurrealTenantRepository::new(db.clone())
        .create(CreateTenant {
            name: format!("Institute {code}"),
            code: code.into(),
            subdomain: subdomain.into(),
            subscription_tier: SubscriptionTier::Basic,
            student_limit: UsageLimit::Max(50),
            class_limit: UsageLimit::Max(5),
        })
        .await
        .unwrap()
}

fn principal_input(tenant_id: Uuid, email: &str, role: Role) -> CreatePrincipal {
    CreatePrincipal {
        tenant_id,
        email: email.into(),
        name: "Test Person".into(),
        role,
        password: "correct-horse-battery".into(),
    }
}

// -----------------------------------------------------------------------
// Tenants
// -----------------------------------------------------------------------

#[tokio::test]
async fn tenant_lookup_by_id_code_and_subdomain() {
    let db = setup().await;
    let repo = SurrealTenantRepository::new(db.clone());
    let tenant = create_tenant(&db, "NORTH-01", "northside").await;

    assert_eq!(tenant.subscription_tier, SubscriptionTier::Basic);
    assert_eq!(tenant.student_limit, UsageLimit::Max(50));

    let by_id = repo.get_by_id(tenant.id).await.unwrap();
    assert_eq!(by_id.code, "NORTH-01");

    let by_code = repo.get_by_code("NORTH-01").await.unwrap();
    assert_eq!(by_code.id, tenant.id);

    let by_subdomain = repo.get_by_subdomain("northside").await.unwrap();
    assert_eq!(by_subdomain.id, tenant.id);
}

#[tokio::test]
async fn tenant_lookup_is_exact_match() {
    let db = setup().await;
    let repo = SurrealTenantRepository::new(db.clone());
    create_tenant(&db, "NORTH-01", "northside").await;

    let err = repo.get_by_code("NORTH").await.unwrap_err();
    assert!(matches!(err, CampusError::NotFound { .. }));

    let err = repo.get_by_subdomain("north").await.unwrap_err();
    assert!(matches!(err, CampusError::NotFound { .. }));
}

#[tokio::test]
async fn duplicate_tenant_code_is_rejected() {
    let db = setup().await;
    let repo = SurrealTenantRepository::new(db.clone());
    create_tenant(&db, "NORTH-01", "northside").await;

    let err = repo
        .create(CreateTenant {
            name: "Copycat".into(),
            code: "NORTH-01".into(),
            subdomain: "copycat".into(),
            subscription_tier: SubscriptionTier::Basic,
            student_limit: UsageLimit::Max(50),
            class_limit: UsageLimit::Max(5),
        })
        .await
        .unwrap_err();

    assert!(
        matches!(err, CampusError::AlreadyExists { .. }),
        "expected AlreadyExists, got: {err:?}"
    );
}

#[tokio::test]
async fn update_subscription_round_trips_unlimited() {
    let db = setup().await;
    let repo = SurrealTenantRepository::new(db.clone());
    let tenant = create_tenant(&db, "NORTH-01", "northside").await;

    let updated = repo
        .update_subscription(
            tenant.id,
            TierChange {
                tier: SubscriptionTier::Enterprise,
                student_limit: UsageLimit::Unlimited,
                class_limit: UsageLimit::Unlimited,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.subscription_tier, SubscriptionTier::Enterprise);
    assert!(updated.student_limit.is_unlimited());

    let fetched = repo.get_by_id(tenant.id).await.unwrap();
    assert_eq!(fetched.subscription_tier, SubscriptionTier::Enterprise);
    assert!(fetched.class_limit.is_unlimited());
}

#[tokio::test]
async fn update_subscription_of_missing_tenant_is_not_found() {
    let db = setup().await;
    let repo = SurrealTenantRepository::new(db);

    let err = repo
        .update_subscription(
            Uuid::new_v4(),
            TierChange {
                tier: SubscriptionTier::Pro,
                student_limit: UsageLimit::Max(500),
                class_limit: UsageLimit::Max(50),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CampusError::NotFound { .. }));
}

#[tokio::test]
async fn deleted_tenant_frees_its_code_and_subdomain() {
    let db = setup().await;
    let repo = SurrealTenantRepository::new(db.clone());
    let tenant = create_tenant(&db, "NORTH-01", "northside").await;

    repo.delete(tenant.id).await.unwrap();
    let err = repo.get_by_id(tenant.id).await.unwrap_err();
    assert!(matches!(err, CampusError::NotFound { .. }));

    let again = create_tenant(&db, "NORTH-01", "northside").await;
    assert_ne!(again.id, tenant.id);

    // Deleting twice is harmless.
    repo.delete(tenant.id).await.unwrap();
}

// -----------------------------------------------------------------------
// Principals
// -----------------------------------------------------------------------

#[tokio::test]
async fn principal_password_is_hashed() {
    let db = setup().await;
    let tenant = create_tenant(&db, "NORTH-01", "northside").await;
    let repo = SurrealPrincipalRepository::new(db);

    let principal = repo
        .create(principal_input(tenant.id, "alice@example.com", Role::Teacher))
        .await
        .unwrap();

    assert_eq!(principal.role, Role::Teacher);
    assert!(principal.password_hash.starts_with("$argon2id$"));
    assert_ne!(principal.password_hash, "correct-horse-battery");

    let fetched = repo.get_by_email(tenant.id, "alice@example.com").await.unwrap();
    assert_eq!(fetched.id, principal.id);
    let fetched = repo.get_by_id(tenant.id, principal.id).await.unwrap();
    assert_eq!(fetched.email, "alice@example.com");
}

#[tokio::test]
async fn same_email_in_two_tenants_is_two_principals() {
    let db = setup().await;
    let north = create_tenant(&db, "NORTH-01", "northside").await;
    let south = create_tenant(&db, "SOUTH-01", "southside").await;
    let repo = SurrealPrincipalRepository::new(db);

    let a = repo
        .create(principal_input(north.id, "sam@example.com", Role::Student))
        .await
        .unwrap();
    let b = repo
        .create(principal_input(south.id, "sam@example.com", Role::Parent))
        .await
        .unwrap();
    assert_ne!(a.id, b.id);

    let err = repo
        .create(principal_input(north.id, "sam@example.com", Role::Teacher))
        .await
        .unwrap_err();
    assert!(matches!(err, CampusError::AlreadyExists { .. }));
}

#[tokio::test]
async fn principal_reads_are_tenant_scoped() {
    let db = setup().await;
    let north = create_tenant(&db, "NORTH-01", "northside").await;
    let south = create_tenant(&db, "SOUTH-01", "southside").await;
    let repo = SurrealPrincipalRepository::new(db);

    let alice = repo
        .create(principal_input(north.id, "alice@example.com", Role::Admin))
        .await
        .unwrap();

    let err = repo.get_by_id(south.id, alice.id).await.unwrap_err();
    assert!(matches!(err, CampusError::NotFound { .. }));
    let err = repo
        .get_by_email(south.id, "alice@example.com")
        .await
        .unwrap_err();
    assert!(matches!(err, CampusError::NotFound { .. }));
}

#[tokio::test]
async fn count_by_role_counts_only_the_tenant() {
    let db = setup().await;
    let north = create_tenant(&db, "NORTH-01", "northside").await;
    let south = create_tenant(&db, "SOUTH-01", "southside").await;
    let repo = SurrealPrincipalRepository::new(db);

    assert_eq!(repo.count_by_role(north.id, Role::Student).await.unwrap(), 0);

    for i in 0..3 {
        repo.create(principal_input(
            north.id,
            &format!("student{i}@example.com"),
            Role::Student,
        ))
        .await
        .unwrap();
    }
    repo.create(principal_input(north.id, "t@example.com", Role::Teacher))
        .await
        .unwrap();
    repo.create(principal_input(south.id, "s@example.com", Role::Student))
        .await
        .unwrap();

    assert_eq!(repo.count_by_role(north.id, Role::Student).await.unwrap(), 3);
    assert_eq!(repo.count_by_role(north.id, Role::Teacher).await.unwrap(), 1);
    assert_eq!(repo.count_by_role(south.id, Role::Student).await.unwrap(), 1);
}

// -----------------------------------------------------------------------
// Resources and enrollments
// -----------------------------------------------------------------------

#[tokio::test]
async fn resources_keep_owner_and_parent() {
    let db = setup().await;
    let tenant = create_tenant(&db, "NORTH-01", "northside").await;
    let repo = SurrealResourceRepository::new(db);
    let teacher_id = Uuid::new_v4();

    let class = repo
        .create(CreateResource {
            tenant_id: tenant.id,
            kind: ResourceKind::Class,
            name: "Algebra I".into(),
            owner_id: Some(teacher_id),
            parent_id: None,
        })
        .await
        .unwrap();
    let homework = repo
        .create(CreateResource {
            tenant_id: tenant.id,
            kind: ResourceKind::Homework,
            name: "Problem set 1".into(),
            owner_id: Some(teacher_id),
            parent_id: Some(class.id),
        })
        .await
        .unwrap();

    let fetched = repo.get_by_id(tenant.id, homework.id).await.unwrap();
    assert_eq!(fetched.kind, ResourceKind::Homework);
    assert_eq!(fetched.parent_id, Some(class.id));
    assert!(fetched.is_owned_by(teacher_id));

    assert_eq!(
        repo.count_by_kind(tenant.id, ResourceKind::Class).await.unwrap(),
        1
    );

    let owned = repo
        .list_by_owner(tenant.id, teacher_id, ResourceKind::Class)
        .await
        .unwrap();
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].id, class.id);
}

#[tokio::test]
async fn resource_reads_are_tenant_scoped() {
    let db = setup().await;
    let north = create_tenant(&db, "NORTH-01", "northside").await;
    let south = create_tenant(&db, "SOUTH-01", "southside").await;
    let repo = SurrealResourceRepository::new(db);

    let class = repo
        .create(CreateResource {
            tenant_id: north.id,
            kind: ResourceKind::Class,
            name: "Biology".into(),
            owner_id: None,
            parent_id: None,
        })
        .await
        .unwrap();

    let err = repo.get_by_id(south.id, class.id).await.unwrap_err();
    assert!(matches!(err, CampusError::NotFound { .. }));
    assert_eq!(
        repo.count_by_kind(south.id, ResourceKind::Class).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn enrollment_lifecycle() {
    let db = setup().await;
    let tenant = create_tenant(&db, "NORTH-01", "northside").await;
    let repo = SurrealEnrollmentRepository::new(db);
    let class_id = Uuid::new_v4();
    let student_id = Uuid::new_v4();

    assert!(!repo.is_enrolled(tenant.id, class_id, student_id).await.unwrap());

    let enrollment = repo.enroll(tenant.id, class_id, student_id).await.unwrap();
    assert_eq!(enrollment.student_id, student_id);
    assert!(repo.is_enrolled(tenant.id, class_id, student_id).await.unwrap());

    let err = repo.enroll(tenant.id, class_id, student_id).await.unwrap_err();
    assert!(matches!(err, CampusError::AlreadyExists { .. }));

    let listed = repo.list_for_class(tenant.id, class_id).await.unwrap();
    assert_eq!(listed.len(), 1);

    repo.unenroll(tenant.id, class_id, student_id).await.unwrap();
    assert!(!repo.is_enrolled(tenant.id, class_id, student_id).await.unwrap());
}

#[tokio::test]
async fn enrollment_is_tenant_scoped() {
    let db = setup().await;
    let north = create_tenant(&db, "NORTH-01", "northside").await;
    let south = create_tenant(&db, "SOUTH-01", "southside").await;
    let repo = SurrealEnrollmentRepository::new(db);
    let class_id = Uuid::new_v4();
    let student_id = Uuid::new_v4();

    repo.enroll(north.id, class_id, student_id).await.unwrap();
    assert!(!repo.is_enrolled(south.id, class_id, student_id).await.unwrap());
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let db = setup().await;
    campus_db::run_migrations(&db).await.unwrap();
    create_tenant(&db, "NORTH-01", "northside").await;
}
