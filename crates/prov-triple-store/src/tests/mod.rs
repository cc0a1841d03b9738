mod http_endpoint;
