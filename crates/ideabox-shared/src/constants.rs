// Reaction value counted by `reaction_quantity`.
pub const LIKE: &str = "LIKE";

pub const MSG_NOT_AUTHENTICATED: &str = "You are not logged in.";
pub const MSG_NO_REACTION: &str = "You don't have a reaction for this idea";
pub const MSG_ALREADY_REACTED: &str = "You already reacted to this idea.";
pub const MSG_CHALLENGE_NOT_FOUND: &str = "Challenge not found.";
pub const MSG_IDEA_NOT_FOUND: &str = "Idea not found.";
pub const MSG_NO_CURRENT_CHALLENGE: &str = "No challenge selected.";
pub const MSG_INVALID_TOKEN: &str = "Invalid token";
pub const MSG_NO_REFRESH_TOKEN: &str = "No refresh token available.";

pub const MSG_FETCH_CHALLENGES: &str = "Could not get challenges.";
pub const MSG_FETCH_MY_CHALLENGES: &str = "Could not get your challenges.";
pub const MSG_FETCH_USER_CHALLENGES: &str = "Could not get user's challenges.";
pub const MSG_FETCH_CHALLENGE: &str = "Could not get challenge.";
pub const MSG_CREATE_CHALLENGE: &str = "Could not create challenge.";
pub const MSG_UPDATE_CHALLENGE: &str = "Could not update challenge.";
pub const MSG_DELETE_CHALLENGE: &str = "Could not delete challenge.";

pub const MSG_FETCH_CHALLENGE_IDEAS: &str = "Could not get challenge ideas.";
pub const MSG_FETCH_MY_IDEAS: &str = "Could not get user's ideas.";
pub const MSG_FETCH_USER_IDEAS: &str = "Could not get user ideas.";
pub const MSG_FETCH_LIKES: &str = "Could not get user's likes.";
pub const MSG_FETCH_IDEA: &str = "Could not get idea.";
pub const MSG_CREATE_IDEA: &str = "Could not create idea.";
pub const MSG_UPDATE_IDEA: &str = "Could not update idea.";
pub const MSG_DELETE_IDEA: &str = "Could not delete idea.";

pub const MSG_CREATE_REACTION: &str = "Could not react to idea.";
pub const MSG_DELETE_REACTION: &str = "Could not delete reaction.";

pub const MSG_FETCH_USER: &str = "Could not get user data.";
pub const MSG_UPDATE_USER: &str = "Could not update user.";
pub const MSG_CONFIRM_EMAIL: &str = "Could not confirm email.";
pub const MSG_CHECK_EMAIL: &str = "Could not check email.";
pub const MSG_REFRESH_TOKENS: &str = "Could not refresh session.";
pub const MSG_UNEXPECTED: &str =
    "There was an unexpected problem. Please try again in a few minutes.";

pub const MSG_EMPTY_NAME: &str = "Name field is empty.";
pub const MSG_EMPTY_EMAIL: &str = "Email field is empty.";
pub const MSG_EMPTY_PASSWORD: &str = "Password field is empty.";
