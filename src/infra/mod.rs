pub mod gas_station;
