mod ingress;

pub use ingress::{IngressServer, ingress_router};
