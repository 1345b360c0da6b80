pub mod cashflows;
