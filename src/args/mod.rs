mod cli;


pub use cli::{Command, CompareArgs, TesterArgs};
