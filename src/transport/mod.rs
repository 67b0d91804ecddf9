pub mod deploy;
pub mod route;

pub use deploy::{best_deployment, best_shore_deployment_source, rank_candidates, Deployment};
pub use route::{plan_transport, transport_step, RouteError, TransportPlan, TransportStep};
