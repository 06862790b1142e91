mod auth_tests;
mod events_tests;
mod loads_tests;
mod negotiate_tests;
