mod elastic_net;
mod l1;
mod l2;
mod penalty;

pub use elastic_net::ElasticNetPenalty;
pub use l1::L1Penalty;
pub use l2::{L2Penalty, ProximalL2Penalty};
pub use penalty::{Penalty, ProximalPenalty, soft_threshold};
