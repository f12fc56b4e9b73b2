pub mod config;
pub mod output;
pub mod engine_types;
pub mod sieve_math;
pub mod prime_pi_engine;
pub mod nth_prime;
pub mod verify;
pub mod memory;
