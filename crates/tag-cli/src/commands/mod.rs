pub mod config_ops;
pub mod dict_ops;
