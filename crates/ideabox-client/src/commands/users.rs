use ideabox_shared::constants::{
    MSG_EMPTY_EMAIL, MSG_EMPTY_NAME, MSG_EMPTY_PASSWORD, MSG_INVALID_TOKEN, MSG_NO_REFRESH_TOKEN,
};
use ideabox_shared::{ApiError, Field, FieldError, UserId};
use tracing::info;

use crate::api::{
    AuthRequest, ByIdRequest, ResetPasswordRequest, SignInRequest, SignUpRequest, Tokens,
    UpdateUserRequest,
};
use crate::state::StoreState;
use crate::status::{CheckEmailStatus, EmptyStatus, FetchUserStatus, Operation, Status, TokensStatus};
use crate::store::DataStore;

/// Collect one error per blank field, `None` when all are filled.
fn validate(fields: &[(Field, &str, &str)]) -> Option<ApiError> {
    let errors: Vec<FieldError> = fields
        .iter()
        .filter(|(_, value, _)| value.trim().is_empty())
        .map(|(field, _, message)| FieldError::new(*field, *message))
        .collect();
    (!errors.is_empty()).then_some(ApiError::Validation { errors })
}

fn store_tokens(state: &mut StoreState, tokens: &Tokens) {
    state.session.auth_token = Some(tokens.auth_token.clone());
    if let Some(refresh) = &tokens.refresh_token {
        state.session.refresh_token = Some(refresh.clone());
    }
}

impl DataStore {
    /// Exchange credentials for tokens.  Blank fields are rejected locally.
    pub async fn sign_in(&self, email: &str, password: &str) -> TokensStatus {
        if let Some(error) = validate(&[
            (Field::Email, email, MSG_EMPTY_EMAIL),
            (Field::Password, password, MSG_EMPTY_PASSWORD),
        ]) {
            return self.reject(Operation::SignIn, |s| &mut s.sign_in, error);
        }
        let req = SignInRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let status = self
            .execute(
                Operation::SignIn,
                |s| &mut s.sign_in,
                |_| Ok(req),
                |api, req| async move { api.sign_in(req).await },
                |state, tokens| {
                    store_tokens(state, &tokens);
                    Ok(None)
                },
            )
            .await;
        if status.is_success() {
            info!("Signed in");
            self.publish_session();
        }
        status
    }

    /// Register an account.  An email already in use comes back as
    /// `BadUserInput` with `extra = "EMAIL_IN_USE"`.
    pub async fn sign_up(&self, name: &str, email: &str, password: &str) -> EmptyStatus {
        if let Some(error) = validate(&[
            (Field::Name, name, MSG_EMPTY_NAME),
            (Field::Email, email, MSG_EMPTY_EMAIL),
            (Field::Password, password, MSG_EMPTY_PASSWORD),
        ]) {
            return self.reject(Operation::SignUp, |s| &mut s.sign_up, error);
        }
        let req = SignUpRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };

        self.execute(
            Operation::SignUp,
            |s| &mut s.sign_up,
            |_| Ok(req),
            |api, req| async move { api.sign_up(req).await },
            |_, ()| Ok(None),
        )
        .await
    }

    /// Trade the refresh token for a new token pair.  Runs once; scheduling
    /// refreshes is up to the caller.
    pub async fn refresh_tokens(&self) -> TokensStatus {
        let status = self
            .execute(
                Operation::RefreshTokens,
                |s| &mut s.refresh_tokens,
                |state| {
                    state
                        .session
                        .refresh_token
                        .clone()
                        .ok_or_else(|| ApiError::generic(MSG_NO_REFRESH_TOKEN))
                },
                |api, refresh| async move { api.refresh_tokens(refresh).await },
                |state, tokens| {
                    store_tokens(state, &tokens);
                    Ok(None)
                },
            )
            .await;
        if status.is_success() {
            self.publish_session();
        }
        status
    }

    /// Adopt `token` if it identifies a user.
    ///
    /// On failure the token is dropped again and reported as
    /// `BadUserInput "Invalid token"`, unless the check itself failed
    /// generically.
    pub async fn test_token(&self, token: String, refresh_token: Option<String>) -> FetchUserStatus {
        self.set_auth_token(Some(token));
        let fetched = self.fetch_me().await;

        let status = if fetched.is_success() {
            if let Some(refresh) = refresh_token {
                self.mutate(|state| state.session.refresh_token = Some(refresh));
                self.publish_session();
            }
            fetched
        } else {
            self.set_auth_token(None);
            let error = match fetched.error {
                Some(error @ ApiError::Generic { .. }) => error,
                _ => ApiError::bad_user_input(MSG_INVALID_TOKEN, None),
            };
            Status::failed(error, fetched.api_response)
        };

        self.record(Operation::TestToken, |s| &mut s.test_token, status.clone());
        status
    }

    /// Load the signed-in user and make it the current user.
    pub async fn fetch_me(&self) -> FetchUserStatus {
        self.execute(
            Operation::FetchMe,
            |s| &mut s.fetch_me,
            |state| {
                Ok(AuthRequest {
                    auth_token: Some(state.session.require_token()?),
                })
            },
            |api, req| async move { api.fetch_me(req).await },
            |state, user| {
                let id = state.cache.ingest_user(user);
                state.cache.set_current_user(Some(id.clone()));
                Ok(Some(id))
            },
        )
        .await
    }

    pub async fn fetch_user(&self, id: UserId) -> FetchUserStatus {
        self.execute(
            Operation::FetchUser,
            |s| &mut s.fetch_user,
            |state| {
                Ok(ByIdRequest {
                    auth_token: state.session.auth_token.clone(),
                    id,
                })
            },
            |api, req| async move { api.fetch_user(req).await },
            |state, user| Ok(Some(state.cache.ingest_user(user))),
        )
        .await
    }

    /// Update the signed-in user's profile and merge the result into the
    /// current user.
    pub async fn update_me(&self, name: Option<String>, image_url: Option<String>) -> FetchUserStatus {
        self.execute(
            Operation::UpdateMe,
            |s| &mut s.update_me,
            |state| {
                let (token, viewer) = state.require_viewer()?;
                Ok(UpdateUserRequest {
                    auth_token: Some(token),
                    id: viewer,
                    name,
                    image_url,
                })
            },
            |api, req| async move { api.update_user(req).await },
            |state, user| {
                let id = state.cache.ingest_user(user);
                if state.cache.current_user().is_none() {
                    state.cache.set_current_user(Some(id.clone()));
                }
                Ok(Some(id))
            },
        )
        .await
    }

    pub async fn resend_email_confirmation(&self, email: &str) -> EmptyStatus {
        let email = email.to_string();
        self.execute(
            Operation::ResendEmailConfirmation,
            |s| &mut s.resend_email_confirmation,
            |_| Ok(email),
            |api, email| async move { api.resend_email_confirmation(email).await },
            |_, ()| Ok(None),
        )
        .await
    }

    pub async fn request_reset_password(&self, email: &str) -> EmptyStatus {
        if let Some(error) = validate(&[(Field::Email, email, MSG_EMPTY_EMAIL)]) {
            return self.reject(
                Operation::RequestResetPassword,
                |s| &mut s.request_reset_password,
                error,
            );
        }
        let email = email.to_string();

        self.execute(
            Operation::RequestResetPassword,
            |s| &mut s.request_reset_password,
            |_| Ok(email),
            |api, email| async move { api.request_reset_password(email).await },
            |_, ()| Ok(None),
        )
        .await
    }

    pub async fn reset_password(&self, token: &str, password: &str) -> EmptyStatus {
        if let Some(error) = validate(&[(Field::Password, password, MSG_EMPTY_PASSWORD)]) {
            return self.reject(Operation::ResetPassword, |s| &mut s.reset_password, error);
        }
        let req = ResetPasswordRequest {
            token: token.to_string(),
            password: password.to_string(),
        };

        self.execute(
            Operation::ResetPassword,
            |s| &mut s.reset_password,
            |_| Ok(req),
            |api, req| async move { api.reset_password(req).await },
            |_, ()| Ok(None),
        )
        .await
    }

    pub async fn confirm_email(&self, token: &str) -> EmptyStatus {
        let token = token.to_string();
        self.execute(
            Operation::ConfirmEmail,
            |s| &mut s.confirm_email,
            |_| Ok(token),
            |api, token| async move { api.confirm_email(token).await },
            |_, ()| Ok(None),
        )
        .await
    }

    /// Whether `email` can sign up.
    pub async fn check_email(&self, email: &str) -> CheckEmailStatus {
        let email = email.to_string();
        self.execute(
            Operation::CheckEmail,
            |s| &mut s.check_email,
            |_| Ok(email),
            |api, email| async move { api.check_email(email).await },
            |_, check| Ok(Some(check)),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::api::EmailCheck;
    use crate::events::Change;
    use crate::status::Statuses;
    use crate::testing::{store_with, user, MockApi};
    use ideabox_shared::User;
    use ideabox_store::ChangeKey;

    fn tokens(auth: &str, refresh: Option<&str>) -> Tokens {
        Tokens {
            auth_token: auth.to_string(),
            refresh_token: refresh.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_sign_in_validates_blank_fields() {
        let api = MockApi::new();
        let store = store_with(&api, false);

        let status = store.sign_in("  ", "").await;

        let Some(ApiError::Validation { errors }) = status.error else {
            panic!("expected validation error");
        };
        let fields: Vec<Field> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec![Field::Email, Field::Password]);
        assert_eq!(api.calls("sign_in"), 0);
    }

    #[tokio::test]
    async fn test_sign_in_stores_tokens() {
        let api = MockApi::new();
        api.respond("sign_in", Ok(tokens("auth", Some("refresh"))));
        let store = store_with(&api, false);
        let mut session = store.subscribe([Change::Session]);

        let status = store.sign_in("ada@example.com", "secret").await;

        assert!(status.is_success());
        assert!(store.is_authenticated());
        assert_eq!(store.session().refresh_token.as_deref(), Some("refresh"));
        assert_eq!(session.try_recv(), Some(Change::Session));
    }

    #[tokio::test]
    async fn test_sign_up_forwards_email_in_use() {
        let api = MockApi::new();
        api.respond::<()>(
            "sign_up",
            Err(ApiError::bad_user_input("Email in use", Some("EMAIL_IN_USE"))),
        );
        let store = store_with(&api, false);

        let status = store.sign_up("Ada", "ada@example.com", "secret").await;

        assert!(matches!(
            status.error,
            Some(ApiError::BadUserInput { extra: Some(ref extra), .. }) if extra == "EMAIL_IN_USE"
        ));
    }

    #[tokio::test]
    async fn test_invalid_token_is_dropped() {
        let api = MockApi::new();
        api.respond::<User>("fetch_me", Err(ApiError::object_not_found("no such session")));
        let store = store_with(&api, false);

        let status = store.test_token("stale".into(), None).await;

        assert_eq!(status.error, Some(ApiError::bad_user_input(MSG_INVALID_TOKEN, None)));
        assert!(!store.is_authenticated());
        assert_eq!(store.status(|s| s.test_token.clone()), status);
    }

    #[tokio::test]
    async fn test_valid_token_sets_current_user() {
        let api = MockApi::new();
        api.respond("fetch_me", Ok(user(json!({"id": "me", "name": "Ada"}))));
        let store = store_with(&api, false);

        let status = store.test_token("good".into(), Some("refresh".into())).await;

        assert!(status.is_success());
        assert_eq!(store.current_user().unwrap().name.as_deref(), Some("Ada"));
        assert_eq!(store.session().refresh_token.as_deref(), Some("refresh"));
    }

    #[tokio::test]
    async fn test_refresh_needs_refresh_token() {
        let api = MockApi::new();
        let store = store_with(&api, true);

        let status = store.refresh_tokens().await;

        assert_eq!(status.error, Some(ApiError::generic(MSG_NO_REFRESH_TOKEN)));
        assert_eq!(api.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_update_me_merges_into_current_user() {
        let api = MockApi::new();
        api.respond("fetch_me", Ok(user(json!({"id": "me", "name": "Ada", "email": "ada@example.com"}))));
        api.respond("update_user", Ok(user(json!({"id": "me", "name": "Ada L."}))));
        let store = store_with(&api, true);
        store.fetch_me().await;

        let status = store.update_me(Some("Ada L.".into()), None).await;

        assert!(status.is_success());
        let me = store.current_user().unwrap();
        assert_eq!(me.name.as_deref(), Some("Ada L."));
        assert_eq!(me.email.as_deref(), Some("ada@example.com"));
    }

    #[tokio::test]
    async fn test_password_reset_validation() {
        let api = MockApi::new();
        let store = store_with(&api, false);

        assert_eq!(store.request_reset_password("").await.error_code(), Some("VALIDATION_ERROR"));
        assert_eq!(store.reset_password("tok", " ").await.error_code(), Some("VALIDATION_ERROR"));
        assert_eq!(api.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_check_email_payload() {
        let api = MockApi::new();
        let check = EmailCheck {
            is_available: true,
            is_blacklisted: false,
            is_corporate: true,
        };
        api.respond("check_email", Ok(check));
        let store = store_with(&api, false);

        assert_eq!(store.check_email("ada@corp.example").await.payload, Some(check));
    }

    #[tokio::test]
    async fn test_confirm_email_failure_message() {
        let api = MockApi::new();
        let store = store_with(&api, false);

        let status = store.confirm_email("tok").await;
        assert_eq!(status.error, Some(ApiError::generic("Could not confirm email.")));
    }

    #[tokio::test]
    async fn test_sign_out_resets_everything() {
        let api = MockApi::new();
        api.respond("fetch_me", Ok(user(json!({"id": "me"}))));
        let store = store_with(&api, true);
        store.fetch_me().await;
        let mut current_user = store.subscribe([Change::Cache(ChangeKey::CurrentUser)]);

        store.sign_out();

        assert!(!store.is_authenticated());
        assert!(store.current_user().is_none());
        assert!(store.read(|cache| cache.is_empty()));
        assert_eq!(store.statuses(), Statuses::default());
        assert_eq!(current_user.try_recv(), Some(Change::Cache(ChangeKey::CurrentUser)));
    }
}
