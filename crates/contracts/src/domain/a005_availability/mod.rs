pub mod aggregate;

pub use aggregate::Availability;
