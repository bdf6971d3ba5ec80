mod consultation_flow;
mod store_failures;
