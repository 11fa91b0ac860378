//! Status objects returned by every operation.
//!
//! A [`Status`] goes from idle to loading when the operation starts and is
//! written exactly once more with its terminal state.  The last status of
//! each operation is kept in [`Statuses`] for callers that render from it.

use std::fmt;

use ideabox_shared::constants::*;
use ideabox_shared::{ApiError, Challenge, ChallengeId, Idea, IdeaId, Reaction, ReactionId, User, UserId};
use ideabox_store::Page;

use crate::api::{ApiResult, ChallengePage, EmailCheck, IdeaPage, Tokens};

/// Loading/result state of one operation.
///
/// `api_response` is the raw collaborator result, `payload` what the store
/// made of it (usually the cached ids).
#[derive(Debug, Clone, PartialEq)]
pub struct Status<R, P = ()> {
    pub is_loading: bool,
    pub success: Option<bool>,
    pub error: Option<ApiError>,
    pub api_response: Option<ApiResult<R>>,
    pub payload: Option<P>,
}

impl<R, P> Default for Status<R, P> {
    fn default() -> Self {
        Self::idle()
    }
}

impl<R, P> Status<R, P> {
    pub fn idle() -> Self {
        Self {
            is_loading: false,
            success: None,
            error: None,
            api_response: None,
            payload: None,
        }
    }

    pub fn loading() -> Self {
        Self {
            is_loading: true,
            ..Self::idle()
        }
    }

    pub fn succeeded(response: R, payload: Option<P>) -> Self {
        Self {
            is_loading: false,
            success: Some(true),
            error: None,
            api_response: Some(Ok(response)),
            payload,
        }
    }

    pub fn failed(error: ApiError, api_response: Option<ApiResult<R>>) -> Self {
        Self {
            is_loading: false,
            success: Some(false),
            error: Some(error),
            api_response,
            payload: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.success == Some(true)
    }

    /// Wire code of the error, if the operation failed.
    pub fn error_code(&self) -> Option<&'static str> {
        self.error.as_ref().map(ApiError::code)
    }
}

// -- Per-operation shapes --

pub type FetchChallengeListStatus = Status<Vec<Challenge>, Vec<ChallengeId>>;
pub type FetchMyChallengesStatus = Status<ChallengePage, Page<ChallengeId>>;
pub type FetchUserChallengesStatus = Status<ChallengePage, Page<ChallengeId>>;
pub type FetchChallengeStatus = Status<Option<Challenge>, ChallengeId>;
pub type CreateChallengeStatus = Status<Challenge, ChallengeId>;
pub type UpdateChallengeStatus = Status<Challenge, ChallengeId>;
pub type DeleteChallengeStatus = Status<(), ChallengeId>;

pub type FetchIdeasStatus = Status<IdeaPage, Page<IdeaId>>;
pub type FetchIdeaStatus = Status<Idea, IdeaId>;
pub type CreateIdeaStatus = Status<Idea, IdeaId>;
pub type UpdateIdeaStatus = Status<Idea, IdeaId>;
pub type DeleteIdeaStatus = Status<(), IdeaId>;

pub type CreateReactionStatus = Status<Reaction, ReactionId>;
pub type DeleteReactionStatus = Status<(), ReactionId>;

pub type FetchUserStatus = Status<User, UserId>;
pub type TokensStatus = Status<Tokens>;
pub type EmptyStatus = Status<()>;
pub type CheckEmailStatus = Status<EmailCheck, EmailCheck>;

/// Every logical operation the store exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    FetchChallengeList,
    FetchMyChallenges,
    FetchUserChallenges,
    FetchChallenge,
    CreateChallenge,
    UpdateChallenge,
    DeleteChallenge,
    FetchChallengeIdeas,
    FetchMyIdeas,
    FetchUserIdeas,
    FetchIdeasWithUserReaction,
    FetchIdeasWithMyReaction,
    FetchIdea,
    CreateIdea,
    UpdateIdea,
    DeleteIdea,
    CreateReaction,
    DeleteReaction,
    SignIn,
    SignUp,
    RefreshTokens,
    TestToken,
    FetchMe,
    FetchUser,
    UpdateMe,
    ResendEmailConfirmation,
    RequestResetPassword,
    ResetPassword,
    ConfirmEmail,
    CheckEmail,
}

impl Operation {
    /// Every operation, in declaration order.
    pub const ALL: [Operation; 30] = [
        Self::FetchChallengeList,
        Self::FetchMyChallenges,
        Self::FetchUserChallenges,
        Self::FetchChallenge,
        Self::CreateChallenge,
        Self::UpdateChallenge,
        Self::DeleteChallenge,
        Self::FetchChallengeIdeas,
        Self::FetchMyIdeas,
        Self::FetchUserIdeas,
        Self::FetchIdeasWithUserReaction,
        Self::FetchIdeasWithMyReaction,
        Self::FetchIdea,
        Self::CreateIdea,
        Self::UpdateIdea,
        Self::DeleteIdea,
        Self::CreateReaction,
        Self::DeleteReaction,
        Self::SignIn,
        Self::SignUp,
        Self::RefreshTokens,
        Self::TestToken,
        Self::FetchMe,
        Self::FetchUser,
        Self::UpdateMe,
        Self::ResendEmailConfirmation,
        Self::RequestResetPassword,
        Self::ResetPassword,
        Self::ConfirmEmail,
        Self::CheckEmail,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FetchChallengeList => "fetch_challenge_list",
            Self::FetchMyChallenges => "fetch_my_challenges",
            Self::FetchUserChallenges => "fetch_user_challenges",
            Self::FetchChallenge => "fetch_challenge",
            Self::CreateChallenge => "create_challenge",
            Self::UpdateChallenge => "update_challenge",
            Self::DeleteChallenge => "delete_challenge",
            Self::FetchChallengeIdeas => "fetch_challenge_ideas",
            Self::FetchMyIdeas => "fetch_my_ideas",
            Self::FetchUserIdeas => "fetch_user_ideas",
            Self::FetchIdeasWithUserReaction => "fetch_ideas_with_user_reaction",
            Self::FetchIdeasWithMyReaction => "fetch_ideas_with_my_reaction",
            Self::FetchIdea => "fetch_idea",
            Self::CreateIdea => "create_idea",
            Self::UpdateIdea => "update_idea",
            Self::DeleteIdea => "delete_idea",
            Self::CreateReaction => "create_idea_reaction",
            Self::DeleteReaction => "delete_idea_reaction",
            Self::SignIn => "sign_in",
            Self::SignUp => "sign_up",
            Self::RefreshTokens => "refresh_tokens",
            Self::TestToken => "test_token",
            Self::FetchMe => "fetch_me",
            Self::FetchUser => "fetch_user",
            Self::UpdateMe => "update_me",
            Self::ResendEmailConfirmation => "resend_email_confirmation",
            Self::RequestResetPassword => "request_reset_password",
            Self::ResetPassword => "reset_password",
            Self::ConfirmEmail => "confirm_email",
            Self::CheckEmail => "check_email",
        }
    }

    /// Message that replaces an unspecific collaborator failure.
    pub fn fallback_message(self) -> &'static str {
        match self {
            Self::FetchChallengeList => MSG_FETCH_CHALLENGES,
            Self::FetchMyChallenges => MSG_FETCH_MY_CHALLENGES,
            Self::FetchUserChallenges => MSG_FETCH_USER_CHALLENGES,
            Self::FetchChallenge => MSG_FETCH_CHALLENGE,
            Self::CreateChallenge => MSG_CREATE_CHALLENGE,
            Self::UpdateChallenge => MSG_UPDATE_CHALLENGE,
            Self::DeleteChallenge => MSG_DELETE_CHALLENGE,
            Self::FetchChallengeIdeas => MSG_FETCH_CHALLENGE_IDEAS,
            Self::FetchMyIdeas => MSG_FETCH_MY_IDEAS,
            Self::FetchUserIdeas => MSG_FETCH_USER_IDEAS,
            Self::FetchIdeasWithUserReaction | Self::FetchIdeasWithMyReaction => MSG_FETCH_LIKES,
            Self::FetchIdea => MSG_FETCH_IDEA,
            Self::CreateIdea => MSG_CREATE_IDEA,
            Self::UpdateIdea => MSG_UPDATE_IDEA,
            Self::DeleteIdea => MSG_DELETE_IDEA,
            Self::CreateReaction => MSG_CREATE_REACTION,
            Self::DeleteReaction => MSG_DELETE_REACTION,
            Self::FetchMe | Self::FetchUser | Self::TestToken => MSG_FETCH_USER,
            Self::UpdateMe => MSG_UPDATE_USER,
            Self::RefreshTokens => MSG_REFRESH_TOKENS,
            Self::ConfirmEmail => MSG_CONFIRM_EMAIL,
            Self::CheckEmail => MSG_CHECK_EMAIL,
            Self::SignIn
            | Self::SignUp
            | Self::ResendEmailConfirmation
            | Self::RequestResetPassword
            | Self::ResetPassword => MSG_UNEXPECTED,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Last status of every operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statuses {
    pub fetch_challenge_list: FetchChallengeListStatus,
    pub fetch_my_challenges: FetchMyChallengesStatus,
    pub fetch_user_challenges: FetchUserChallengesStatus,
    pub fetch_challenge: FetchChallengeStatus,
    pub create_challenge: CreateChallengeStatus,
    pub update_challenge: UpdateChallengeStatus,
    pub delete_challenge: DeleteChallengeStatus,

    pub fetch_challenge_ideas: FetchIdeasStatus,
    pub fetch_my_ideas: FetchIdeasStatus,
    pub fetch_user_ideas: FetchIdeasStatus,
    pub fetch_ideas_with_user_reaction: FetchIdeasStatus,
    pub fetch_ideas_with_my_reaction: FetchIdeasStatus,
    pub fetch_idea: FetchIdeaStatus,
    pub create_idea: CreateIdeaStatus,
    pub update_idea: UpdateIdeaStatus,
    pub delete_idea: DeleteIdeaStatus,

    pub create_reaction: CreateReactionStatus,
    pub delete_reaction: DeleteReactionStatus,

    pub sign_in: TokensStatus,
    pub sign_up: EmptyStatus,
    pub refresh_tokens: TokensStatus,
    pub test_token: FetchUserStatus,
    pub fetch_me: FetchUserStatus,
    pub fetch_user: FetchUserStatus,
    pub update_me: FetchUserStatus,
    pub resend_email_confirmation: EmptyStatus,
    pub request_reset_password: EmptyStatus,
    pub reset_password: EmptyStatus,
    pub confirm_email: EmptyStatus,
    pub check_email: CheckEmailStatus,
}

impl Statuses {
    /// Put every status back to idle.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
