pub mod batch;
pub mod collection;
pub mod row;
