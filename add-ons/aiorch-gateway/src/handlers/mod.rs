pub(crate) mod process;
pub(crate) mod sample;
