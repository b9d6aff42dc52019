pub mod scrape_server;
