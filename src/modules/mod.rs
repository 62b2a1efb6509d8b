//! Bundled [`Module`](`crate::Module`)s for the attribute-like parts of [`Data`](`crate::Data`).
//!
//! None of them is registered implicitly. A typical setup is:
//!
//! ```
//! use twig_dom::{init, memory::MemoryHost, modules};
//!
//! let patcher = init::<MemoryHost>(vec![
//! 	modules::attributes::module(),
//! 	modules::class::module(),
//! 	modules::style::module(),
//! 	modules::dataset::module(),
//! ]);
//! assert_eq!(patcher.modules().count(), 4);
//! ```

pub mod attributes;
pub mod class;
pub mod dataset;
pub mod style;
