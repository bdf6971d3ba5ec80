mod engine;
mod errors;
mod guards;
