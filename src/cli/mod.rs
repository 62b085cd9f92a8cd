mod app;

pub use app::{
    AddArgs, App, Command, CompletionArgs, CompletionShell, EditArgs, RemoveArgs, RunArgs, UseArgs,
};
