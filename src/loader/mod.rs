/*!
 * Loader Module
 * Builds the immutable model a scheduler run consumes
 */

pub mod model;
pub mod parser;

pub use model::{LoadedModel, ModelBuilder, ProcessSpec};
pub use parser::{load_file, parse_str};
