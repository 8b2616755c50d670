//! Entity id generation
//!
//! All primary keys are text ids with a short entity prefix, e.g.
//! `trp-6f9f…` for trips. The prefixes match the seeded demo data.

use uuid::Uuid;

pub fn vehicle_id() -> String {
    prefixed("veh")
}

pub fn driver_id() -> String {
    prefixed("drv")
}

pub fn trip_id() -> String {
    prefixed("trp")
}

pub fn maintenance_id() -> String {
    prefixed("mnt")
}

pub fn fuel_log_id() -> String {
    prefixed("fuel")
}

pub fn expense_id() -> String {
    prefixed("exp")
}

pub fn event_id() -> String {
    prefixed("evt")
}

pub fn user_id() -> String {
    prefixed("usr")
}

fn prefixed(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_carry_entity_prefix() {
        assert!(trip_id().starts_with("trp-"));
        assert!(vehicle_id().starts_with("veh-"));
        assert!(fuel_log_id().starts_with("fuel-"));
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(trip_id(), trip_id());
    }
}
