pub mod goals_model;
pub mod goals_repository;
pub mod goals_service;
pub mod goals_traits;

pub use goals_model::{
    Goal, GoalContribution, GoalDB, GoalInput, GoalPatch, GoalPriority, GoalProgress, GoalStats,
    GoalStatus, GoalType, GoalWithProgress, Milestone, NewGoalDB, UpdateGoalDB,
};
pub use goals_repository::GoalRepository;
pub use goals_service::GoalService;
pub use goals_traits::{GoalRepositoryTrait, GoalServiceTrait};
