mod bind;
mod param;
mod sizes;

pub use bind::{BindFrame, BindValue, InputSize, VarKind, Variable};
pub use param::{wrap_param, wrap_params, OutputVariable, Param, Params, WrappedFrame, WrappedParam};
pub use sizes::{guess_input_sizes, SizeDirectives};
