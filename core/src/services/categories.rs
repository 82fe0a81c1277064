use crate::client::ApiClient;
use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{Category, NewCategory};

/// CRUD and search over `/categories/`.
#[derive(Debug, Clone)]
pub struct CategoryService<T> {
    client: ApiClient,
    transport: T,
}

impl<T: Transport> CategoryService<T> {
    pub fn new(client: ApiClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn get_all(&self) -> Result<Vec<Category>, ApiError> {
        let response = self.transport.execute(self.client.build_list_categories())?;
        self.client.parse_list_categories(response)
    }

    pub fn get_by_id(&self, id: i64) -> Result<Category, ApiError> {
        let response = self.transport.execute(self.client.build_get_category(id))?;
        self.client.parse_get_category(response)
    }

    pub fn create(&self, input: &NewCategory) -> Result<Category, ApiError> {
        let response = self.transport.execute(self.client.build_create_category(input)?)?;
        self.client.parse_create_category(response)
    }

    /// Rename a category (full `PUT`).
    pub fn update(&self, id: i64, input: &NewCategory) -> Result<Category, ApiError> {
        let response = self
            .transport
            .execute(self.client.build_update_category(id, input)?)?;
        self.client.parse_update_category(response)
    }

    /// Deleting a missing id yields `ApiError::NotFound`.
    pub fn delete(&self, id: i64) -> Result<(), ApiError> {
        let response = self.transport.execute(self.client.build_delete_category(id))?;
        self.client.parse_delete_category(response)
    }

    /// Server-side name search.
    pub fn search(&self, query: &str) -> Result<Vec<Category>, ApiError> {
        let response = self.transport.execute(self.client.build_search_categories(query))?;
        self.client.parse_search_categories(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;
    use crate::test_support::ScriptedTransport;

    fn service(transport: &ScriptedTransport) -> CategoryService<&ScriptedTransport> {
        CategoryService::new(ApiClient::new("http://api.test"), transport)
    }

    #[test]
    fn get_all_returns_categories() {
        let transport = ScriptedTransport::new();
        transport.respond(200, r#"[{"id":1,"name":"Travail"},{"id":2,"name":"Personnel"}]"#);

        let categories = service(&transport).get_all().unwrap();
        assert_eq!(categories.len(), 2);
        assert_eq!(transport.requests()[0].path, "http://api.test/categories/");
    }

    #[test]
    fn create_returns_server_entity() {
        let transport = ScriptedTransport::new();
        transport.respond(201, r#"{"id":1,"name":"Travail"}"#);

        let created = service(&transport)
            .create(&NewCategory {
                name: "Travail".to_string(),
            })
            .unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.name, "Travail");
        assert_eq!(transport.requests()[0].method, HttpMethod::Post);
    }

    #[test]
    fn network_failure_propagates() {
        let transport = ScriptedTransport::new();
        transport.fail("connection refused");

        let err = service(&transport).get_all().unwrap_err();
        assert_eq!(err, ApiError::Network("connection refused".to_string()));
    }

    #[test]
    fn second_delete_reports_not_found() {
        let transport = ScriptedTransport::new();
        transport.respond(204, "").respond(404, r#"{"detail":"Not found."}"#);

        let svc = service(&transport);
        svc.delete(1).unwrap();
        assert!(svc.delete(1).unwrap_err().is_not_found());
    }

    #[test]
    fn search_hits_query_endpoint() {
        let transport = ScriptedTransport::new();
        transport.respond(200, r#"[{"id":1,"name":"Travail"}]"#);

        let found = service(&transport).search("trav").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(transport.requests()[0].path, "http://api.test/categories/?search=trav");
    }
}
