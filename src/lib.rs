pub mod app;
pub mod controller;
pub mod errors;
pub mod form;
pub mod handlers;
pub mod layout;
pub mod models;
pub mod page;
pub mod registry;
pub mod report;
pub mod state;
pub mod storage;
pub mod ui;

pub use app::router;
pub use controller::CounterFormController;
pub use registry::ControllerRegistry;
pub use state::AppState;
pub use storage::{load_data, resolve_data_path};
