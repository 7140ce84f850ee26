//! Policy identifiers and the string → policy factory.
//!
//! Scenario files name policies by string from a closed set; the registry
//! turns an identifier plus the owning ISP's parameters into a boxed
//! [`RoutingPolicy`].  Unknown identifiers are a configuration error.

use std::str::FromStr;

use eon_net::SlotRange;

use crate::baseline::{BestFit, FirstFit, SlidingWindow, Subnet};
use crate::disaster::{BestFitDa, BestFitSwDa, DaWithBlocking, FirstFitDa, SubnetDa};
use crate::error::PolicyError;
use crate::policy::RoutingPolicy;

/// The closed set of routing policy identifiers.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum PolicyId {
    FirstFit,
    BestFit,
    SlidingWindow,
    Subnet,
    FirstFitDa,
    BestFitDa,
    BestFitSwDa,
    SubnetDa,
    DaWithBlocking,
}

impl PolicyId {
    /// The identifier string accepted at the scenario boundary.
    pub fn as_str(self) -> &'static str {
        match self {
            PolicyId::FirstFit       => "first_fit",
            PolicyId::BestFit        => "best_fit",
            PolicyId::SlidingWindow  => "sliding_window",
            PolicyId::Subnet         => "subnet",
            PolicyId::FirstFitDa     => "first_fit_da",
            PolicyId::BestFitDa      => "best_fit_da",
            PolicyId::BestFitSwDa    => "best_fit_sw_da",
            PolicyId::SubnetDa       => "subnet_da",
            PolicyId::DaWithBlocking => "da_with_blocking",
        }
    }
}

impl FromStr for PolicyId {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first_fit"        => Ok(PolicyId::FirstFit),
            "best_fit"         => Ok(PolicyId::BestFit),
            "sliding_window"   => Ok(PolicyId::SlidingWindow),
            "subnet"           => Ok(PolicyId::Subnet),
            "first_fit_da"     => Ok(PolicyId::FirstFitDa),
            "best_fit_da"      => Ok(PolicyId::BestFitDa),
            "best_fit_sw_da"   => Ok(PolicyId::BestFitSwDa),
            "subnet_da"        => Ok(PolicyId::SubnetDa),
            "da_with_blocking" => Ok(PolicyId::DaWithBlocking),
            other => Err(PolicyError::UnknownPolicy(other.to_string())),
        }
    }
}

impl std::fmt::Display for PolicyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-ISP construction parameters handed to the factory.
#[derive(Clone, Debug)]
pub struct PolicyParams {
    /// The ISP's spectrum zone (used by sliding-window and subnet variants).
    pub zone: SlotRange,
    /// Node-count-sized membership mask of the ISP (subnet variants).
    pub members: Vec<bool>,
    /// Slot demand of this ISP's migration transfers (admission control).
    pub migration_width: u16,
    /// Free-run decrement threshold θ of the admission control.
    pub theta: u32,
}

/// Build a policy from its identifier and the owning ISP's parameters.
pub fn build(id: PolicyId, params: &PolicyParams) -> Box<dyn RoutingPolicy> {
    match id {
        PolicyId::FirstFit      => Box::new(FirstFit),
        PolicyId::BestFit       => Box::new(BestFit),
        PolicyId::SlidingWindow => Box::new(SlidingWindow { zone: params.zone }),
        PolicyId::Subnet        => Box::new(Subnet {
            zone:    params.zone,
            members: params.members.clone(),
        }),
        PolicyId::FirstFitDa    => Box::new(FirstFitDa),
        PolicyId::BestFitDa     => Box::new(BestFitDa),
        PolicyId::BestFitSwDa   => Box::new(BestFitSwDa { zone: params.zone }),
        PolicyId::SubnetDa      => Box::new(SubnetDa {
            zone:    params.zone,
            members: params.members.clone(),
        }),
        PolicyId::DaWithBlocking => {
            Box::new(DaWithBlocking::new(params.theta, params.migration_width))
        }
    }
}
