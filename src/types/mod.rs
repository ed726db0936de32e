pub mod paginate;

pub use paginate::Page;
