//! End-to-end account workflows through the service layer.

use anyhow::Result;
use warden_core::{
    AccountError, AccountId, AccountOperation, AccountRole, AuthenticationError,
    CallerIdentity, DuplicateField, EmailError, PasswordChangeRequest,
    RegistrationSettings, UpdateAccountRequest, ValidationError,
};
use zeroize::Zeroizing;

#[path = "support/mod.rs"]
mod support;

use support::{STAFF_PASSWORD, TestAccounts, create_request, staff_caller};

fn password_change(current: &str, new: &str) -> PasswordChangeRequest {
    PasswordChangeRequest {
        current_password: Zeroizing::new(current.to_string()),
        new_password: Zeroizing::new(new.to_string()),
    }
}

#[tokio::test]
async fn create_then_duplicate_username() -> Result<()> {
    let accounts = TestAccounts::new()?;
    let created = accounts.create_staff("ayu123", "ayu@gmail.com").await?;
    assert_eq!(created.username, "ayu123");
    assert_eq!(created.role, AccountRole::Staff);

    let err = accounts
        .service
        .create_account(Some(&accounts.admin), create_request("ayu123", "lain@gmail.com"))
        .await
        .unwrap_err();
    assert_eq!(err, AccountError::DuplicateField(DuplicateField::Username));

    let err = accounts
        .service
        .create_account(Some(&accounts.admin), create_request("lain123", "AYU@GMAIL.COM"))
        .await
        .unwrap_err();
    assert_eq!(err, AccountError::DuplicateField(DuplicateField::Email));
    Ok(())
}

#[tokio::test]
async fn wrong_email_domain_fails_validation() -> Result<()> {
    let accounts = TestAccounts::new()?;
    let err = accounts
        .service
        .create_account(Some(&accounts.admin), create_request("ayu123", "ayu@yahoo.com"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AccountError::ValidationFailed(ValidationError::Email(EmailError::WrongDomain { .. }))
    ));
    assert!(accounts.service.list_accounts(&accounts.admin).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn create_requires_identity_unless_registration_is_open() -> Result<()> {
    let closed = TestAccounts::new()?;
    let err = closed
        .service
        .create_account(None, create_request("ayu123", "ayu@gmail.com"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        AccountError::AuthenticationMissing(AuthenticationError::Missing)
    );

    let open = TestAccounts::with_registration(RegistrationSettings {
        allow_anonymous: true,
    })?;
    let created = open
        .service
        .create_account(None, create_request("ayu123", "ayu@gmail.com"))
        .await?;
    assert_eq!(created.email, "ayu@gmail.com");
    Ok(())
}

#[tokio::test]
async fn staff_may_create_accounts() -> Result<()> {
    let accounts = TestAccounts::new()?;
    let ayu = accounts.create_staff("ayu123", "ayu@gmail.com").await?;
    let created = accounts
        .service
        .create_account(Some(&staff_caller(&ayu)), create_request("budi999", "budi@gmail.com"))
        .await?;
    assert_eq!(created.username, "budi999");
    Ok(())
}

#[tokio::test]
async fn staff_owner_with_wrong_current_password_is_rejected() -> Result<()> {
    let accounts = TestAccounts::new()?;
    let ayu = accounts.create_staff("ayu123", "ayu@gmail.com").await?;
    let caller = staff_caller(&ayu);

    let err = accounts
        .service
        .change_password(&caller, ayu.id, password_change("Wrong1!x", "Xyz12345@"))
        .await
        .unwrap_err();
    assert_eq!(err, AccountError::IncorrectCurrentPassword);

    let changed = accounts
        .service
        .change_password(&caller, ayu.id, password_change(STAFF_PASSWORD, "Xyz12345@"))
        .await?;
    assert!(changed.updated_at > ayu.updated_at);
    assert!(
        accounts
            .service
            .store()
            .verify_password(ayu.id, "Xyz12345@")
            .await?
    );
    Ok(())
}

#[tokio::test]
async fn admin_bypasses_current_password_check() -> Result<()> {
    let accounts = TestAccounts::new()?;
    let ayu = accounts.create_staff("ayu123", "ayu@gmail.com").await?;

    let changed = accounts
        .service
        .change_password(&accounts.admin, ayu.id, password_change("anything", "Xyz12345@"))
        .await?;
    assert!(changed.updated_at > ayu.updated_at);
    assert_eq!(changed.created_at, ayu.created_at);
    Ok(())
}

#[tokio::test]
async fn weak_new_password_is_rejected_before_current_password_check() -> Result<()> {
    let accounts = TestAccounts::new()?;
    let ayu = accounts.create_staff("ayu123", "ayu@gmail.com").await?;

    let err = accounts
        .service
        .change_password(&staff_caller(&ayu), ayu.id, password_change("Wrong1!x", "weak"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AccountError::ValidationFailed(ValidationError::Password(_))
    ));
    Ok(())
}

#[tokio::test]
async fn staff_cannot_delete_but_admin_can() -> Result<()> {
    let accounts = TestAccounts::new()?;
    let ayu = accounts.create_staff("ayu123", "ayu@gmail.com").await?;

    let err = accounts
        .service
        .delete_account(&staff_caller(&ayu), ayu.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::AuthorizationDenied(_)));

    accounts.service.delete_account(&accounts.admin, ayu.id).await?;
    let err = accounts
        .service
        .get_account(&accounts.admin, ayu.id)
        .await
        .unwrap_err();
    assert_eq!(err, AccountError::NotFound);

    let err = accounts
        .service
        .delete_account(&accounts.admin, ayu.id)
        .await
        .unwrap_err();
    assert_eq!(err, AccountError::NotFound);
    Ok(())
}

#[tokio::test]
async fn staff_reach_only_their_own_record() -> Result<()> {
    let accounts = TestAccounts::new()?;
    let a = accounts.create_staff("ayu123", "ayu@gmail.com").await?;
    let b = accounts.create_staff("budi999", "budi@gmail.com").await?;
    let as_a = staff_caller(&a);

    assert_eq!(accounts.service.get_account(&as_a, a.id).await?.id, a.id);
    let renamed = accounts
        .service
        .update_account(
            &as_a,
            a.id,
            UpdateAccountRequest {
                username: Some("ayu456".into()),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(renamed.username, "ayu456");

    let err = accounts.service.get_account(&as_a, b.id).await.unwrap_err();
    assert!(matches!(err, AccountError::AuthorizationDenied(_)));
    let err = accounts
        .service
        .update_account(&as_a, b.id, UpdateAccountRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::AuthorizationDenied(_)));

    assert_eq!(accounts.service.get_account(&accounts.admin, b.id).await?.id, b.id);
    let err = accounts.service.list_accounts(&as_a).await.unwrap_err();
    assert!(matches!(err, AccountError::AuthorizationDenied(_)));
    Ok(())
}

#[tokio::test]
async fn denial_precedes_validation_and_existence() -> Result<()> {
    let accounts = TestAccounts::new()?;
    let a = accounts.create_staff("ayu123", "ayu@gmail.com").await?;
    let missing = AccountId::new();

    let err = accounts
        .service
        .update_account(
            &staff_caller(&a),
            missing,
            UpdateAccountRequest {
                email: Some("not-an-email".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::AuthorizationDenied(_)));

    let err = accounts
        .service
        .update_account(
            &accounts.admin,
            missing,
            UpdateAccountRequest {
                role: Some(AccountRole::Admin),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err, AccountError::NotFound);
    Ok(())
}

#[tokio::test]
async fn username_only_update_preserves_everything_else() -> Result<()> {
    let accounts = TestAccounts::new()?;
    let a = accounts.create_staff("ayu123", "ayu@gmail.com").await?;
    let hash_before = accounts
        .service
        .store()
        .get(a.id)
        .await?
        .credential_hash()
        .to_string();

    let updated = accounts
        .service
        .update_account(
            &accounts.admin,
            a.id,
            UpdateAccountRequest {
                username: Some("ayu999".into()),
                ..Default::default()
            },
        )
        .await?;

    assert_eq!(updated.email, a.email);
    assert_eq!(updated.role, a.role);
    assert_eq!(updated.created_at, a.created_at);
    assert!(updated.updated_at > a.updated_at);
    let stored = accounts.service.store().get(a.id).await?;
    assert_eq!(stored.credential_hash(), hash_before);
    Ok(())
}

#[tokio::test]
async fn views_never_carry_credentials() -> Result<()> {
    let accounts = TestAccounts::new()?;
    accounts.create_staff("ayu123", "ayu@gmail.com").await?;
    accounts.create_staff("budi999", "budi@gmail.com").await?;

    let views = accounts.service.list_accounts(&accounts.admin).await?;
    let rendered = serde_json::to_string(&views)?;
    assert!(!rendered.contains(STAFF_PASSWORD));
    assert!(!rendered.contains("argon2"));
    assert!(!rendered.contains("credential"));
    Ok(())
}

#[tokio::test]
async fn unique_fields_hold_across_every_pair() -> Result<()> {
    let accounts = TestAccounts::new()?;
    let names = ["ayu123", "budi999", "citra77", "dewi000"];
    for name in names {
        accounts.create_staff(name, &format!("{name}@gmail.com")).await?;
    }
    for name in names {
        let _ = accounts
            .service
            .create_account(
                Some(&accounts.admin),
                create_request("zzzzzz1", &format!("{}@gmail.com", name.to_uppercase())),
            )
            .await;
    }
    // Every retry collides on email regardless of casing.
    let views = accounts.service.list_accounts(&accounts.admin).await?;
    assert_eq!(views.len(), names.len());

    for (i, left) in views.iter().enumerate() {
        for right in &views[i + 1..] {
            assert_ne!(left.username, right.username);
            assert!(!left.email.eq_ignore_ascii_case(&right.email));
        }
    }
    Ok(())
}

#[test]
fn garbled_roles_never_reach_the_service() {
    assert_eq!(
        CallerIdentity::from_assertion(Some("admin-1"), Some("Admin")),
        Err(AuthenticationError::UnrecognizedRole("Admin".to_string()))
    );
}

#[tokio::test]
async fn access_check_alone_matches_the_operations() -> Result<()> {
    let accounts = TestAccounts::new()?;
    let own = accounts.create_staff("ayu123", "ayu@gmail.com").await?;
    let caller = staff_caller(&own);

    let grant = accounts
        .service
        .check_access(Some(&caller), AccountOperation::ChangePassword(own.id))?;
    assert!(grant.requires_current_password);

    assert!(matches!(
        accounts
            .service
            .check_access(Some(&caller), AccountOperation::ListAccounts),
        Err(AccountError::AuthorizationDenied(_))
    ));
    assert_eq!(
        accounts
            .service
            .check_access(None, AccountOperation::CreateAccount),
        Err(AccountError::AuthenticationMissing(AuthenticationError::Missing))
    );

    let open = TestAccounts::with_registration(RegistrationSettings {
        allow_anonymous: true,
    })?;
    assert!(
        open.service
            .check_access(None, AccountOperation::CreateAccount)
            .is_ok()
    );
    assert!(
        open.service
            .check_access(None, AccountOperation::ListAccounts)
            .is_err()
    );
    Ok(())
}
