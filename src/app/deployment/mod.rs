//! Deployment lifecycle: dispatch, run monitoring, status and history.

pub mod controller;
pub mod monitor;
pub mod status;
pub mod tracking;

pub use controller::{ControllerEvent, ControllerOptions, DeploymentController, DispatchedDeployment};
pub use monitor::{MonitorOptions, WorkflowMonitor};
pub use status::{RunRef, RunState, RunStatus, StatusUpdate};
pub use tracking::{DeploymentHistory, DeploymentRecord, DeploymentType};
