mod registration_test;
mod router_test;
