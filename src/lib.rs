pub mod cli_args;
pub mod error;
mod extractor;
mod middleware;
mod openapi;
mod route;
pub mod server;
mod state;
pub mod storage;

#[cfg(test)]
mod test;
