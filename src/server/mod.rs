pub mod app;
mod deserializers;
mod error;
mod routes;
