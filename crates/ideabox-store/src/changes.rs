use ideabox_shared::{ChallengeId, IdeaId, ReactionId, UserId};

/// A cache location that changed and whose observers must be notified.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChangeKey {
    User(UserId),
    Challenge(ChallengeId),
    Idea(IdeaId),
    Reaction(ReactionId),
    ChallengeList,
    CurrentChallenge,
    CurrentUser,
    MyChallenges,
    MyIdeas,
    IdeasWithMyReaction,
}
