pub mod pill;
