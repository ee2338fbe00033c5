pub mod ai_grading;

pub mod assignments;

pub mod auth;

pub mod classes;

pub mod submissions;

pub use ai_grading::configure_ai_grading_routes;
pub use assignments::configure_assignments_routes;
pub use auth::configure_auth_routes;
pub use classes::configure_classes_routes;
pub use submissions::configure_submissions_routes;
