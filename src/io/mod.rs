pub mod index;
pub mod xyz;
