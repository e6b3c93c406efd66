mod value;
mod variables;

pub use value::Value;
pub use variables::VariablesGroup;
