mod auth_test;
mod booking_test;
mod config_test;
mod middleware_test;
mod router_test;
mod shop_test;
