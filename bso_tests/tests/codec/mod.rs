
mod assets;
mod hooks;
mod recovery;
