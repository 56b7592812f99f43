pub mod orders_service;
