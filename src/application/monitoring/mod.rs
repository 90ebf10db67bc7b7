pub mod cycle_health;
