//! JSON:API record store over reqwest

use crate::config::Config;
use crate::error::{Error, Result};
use crate::store::{FileTransfer, LICENSE_PAGE_SIZE, RecordStore};
use crate::types::{
    Container, Contributor, FileRef, License, LicenseRecord, ModerationWorkflow, NewContributor,
    Page, Permission, Provider, PublicationDraft, ReviewAction, ReviewsState, Subject, User,
    WithdrawalRequest,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Record store backed by the JSON:API REST service
pub struct HttpRecordStore {
    client: Client,
    token: Option<String>,
    api_url: String,
    files_url: String,
}

// Wire envelopes

#[derive(Deserialize)]
struct Document<T> {
    data: T,
}

#[derive(Deserialize)]
struct ListDocument<T> {
    data: Vec<T>,
    #[serde(default)]
    links: Links,
}

#[derive(Deserialize, Default)]
struct Links {
    next: Option<String>,
}

#[derive(Deserialize)]
struct Resource<A> {
    id: String,
    attributes: A,
    #[serde(default)]
    relationships: Relationships,
}

#[derive(Deserialize, Default)]
struct Relationships {
    node: Option<Relation>,
    primary_file: Option<Relation>,
    provider: Option<Relation>,
    license: Option<Relation>,
    parent: Option<Relation>,
}

#[derive(Deserialize)]
struct Relation {
    data: Option<RelationData>,
}

#[derive(Deserialize)]
struct RelationData {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    required_fields: Vec<String>,
}

impl Relationships {
    fn id_of(relation: Option<&Relation>) -> Option<String> {
        relation.and_then(|r| r.data.as_ref()).map(|d| d.id.clone())
    }

    fn license(&self) -> Option<License> {
        let data = self.license.as_ref()?.data.as_ref()?;
        Some(License {
            id: data.id.clone(),
            name: data.name.clone().unwrap_or_default(),
            required_fields: data.required_fields.clone(),
        })
    }

    fn primary_file(&self) -> Option<FileRef> {
        let data = self.primary_file.as_ref()?.data.as_ref()?;
        Some(FileRef {
            id: data.id.clone(),
            name: data.name.clone().unwrap_or_default(),
        })
    }
}

#[derive(Deserialize)]
struct ProviderAttributes {
    name: String,
    reviews_workflow: Option<String>,
    #[serde(default)]
    preprint_word: Option<String>,
    #[serde(default)]
    domain: Option<String>,
    #[serde(default)]
    domain_redirect_enabled: bool,
}

#[derive(Deserialize)]
struct LicenseAttributes {
    name: String,
    #[serde(default)]
    required_fields: Vec<String>,
}

#[derive(Deserialize)]
struct SubjectAttributes {
    text: String,
}

#[derive(Deserialize)]
struct DraftAttributes {
    title: Option<String>,
    description: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    doi: Option<String>,
    original_publication_date: Option<String>,
    license_record: Option<LicenseRecord>,
    #[serde(default)]
    subjects: Vec<Vec<Value>>,
    #[serde(default)]
    is_published: bool,
    #[serde(default)]
    reviews_state: Option<ReviewsState>,
}

#[derive(Deserialize)]
struct NodeAttributes {
    title: String,
    description: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    node_license: Option<LicenseRecord>,
    #[serde(default)]
    public: bool,
    #[serde(default)]
    registration: bool,
    #[serde(default)]
    current_user_permissions: Vec<Permission>,
}

#[derive(Deserialize)]
struct ContributorAttributes {
    #[serde(default)]
    bibliographic: bool,
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Deserialize)]
struct UserAttributes {
    full_name: String,
}

#[derive(Deserialize)]
struct FileAttributes {
    name: String,
}

impl HttpRecordStore {
    /// Create a store for the configured API
    pub fn new(config: &Config, token: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            token,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            files_url: config.files_url.trim_end_matches('/').to_string(),
        }
    }

    fn api(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header("Accept", "application/vnd.api+json");
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = self.authorized(request).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(Error::Api(format!("{status}: {}", api_error_detail(&body))))
    }

    async fn get_one<A: DeserializeOwned>(&self, path: &str) -> Result<Resource<A>> {
        let doc: Document<Resource<A>> = self.send(self.client.get(self.api(path))).await?.json().await?;
        Ok(doc.data)
    }

    async fn get_page<A: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<(Vec<Resource<A>>, Option<u32>)> {
        let doc: ListDocument<Resource<A>> = self
            .send(self.client.get(self.api(path)).query(query))
            .await?
            .json()
            .await?;
        let next = doc.links.next.as_deref().and_then(next_page_number);
        Ok((doc.data, next))
    }

    async fn write<A: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        body: &Value,
    ) -> Result<Resource<A>> {
        let doc: Document<Resource<A>> = self.send(request.json(body)).await?.json().await?;
        Ok(doc.data)
    }
}

/// Extract the `page` query parameter from a `links.next` URL
fn next_page_number(next: &str) -> Option<u32> {
    let url = url::Url::parse(next).ok()?;
    url.query_pairs()
        .find(|(k, _)| k == "page")
        .and_then(|(_, v)| v.parse().ok())
}

/// First `errors[].detail` of a JSON:API error body, or the raw body
fn api_error_detail(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("errors")?
                .get(0)?
                .get("detail")?
                .as_str()
                .map(ToString::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}

fn relation(kind: &str, id: Option<&str>) -> Value {
    id.map_or(Value::Null, |id| json!({ "data": { "type": kind, "id": id } }))
}

fn draft_body(draft: &PublicationDraft) -> Value {
    let mut data = json!({
        "type": "preprints",
        "attributes": {
            "title": draft.title,
            "description": draft.description,
            "tags": draft.tags,
            "doi": draft.doi,
            "original_publication_date": draft.original_publication_date.map(|d| d.to_string()),
            "license_record": draft.license_record,
            "subjects": draft.subjects,
            "is_published": draft.is_published,
        },
        "relationships": {
            "node": relation("nodes", draft.container_id.as_deref()),
            "primary_file": relation("files", draft.primary_file.as_ref().map(|f| f.id.as_str())),
            "provider": relation("preprint_providers", draft.provider_id.as_deref()),
            "license": relation("licenses", draft.license.as_ref().map(|l| l.id.as_str())),
        },
    });
    if let Some(id) = &draft.id {
        data["id"] = json!(id);
    }
    json!({ "data": data })
}

fn container_body(container: &Container) -> Value {
    json!({
        "data": {
            "type": "nodes",
            "id": container.id,
            "attributes": {
                "title": container.title,
                "description": container.description,
                "tags": container.tags,
                "node_license": container.license_record,
                "public": container.public,
            },
            "relationships": {
                "license": relation("licenses", container.license.as_ref().map(|l| l.id.as_str())),
            },
        }
    })
}

fn subject_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(o) => o.get("id").and_then(Value::as_str).map(ToString::to_string),
        _ => None,
    }
}

fn into_draft(resource: Resource<DraftAttributes>) -> Result<PublicationDraft> {
    let attrs = resource.attributes;
    let original_publication_date = attrs
        .original_publication_date
        .as_deref()
        .map(|s| {
            // Dates may come back with a time component
            let day = s.get(..10).unwrap_or(s);
            NaiveDate::parse_from_str(day, "%Y-%m-%d")
                .map_err(|e| Error::Parse(format!("bad original_publication_date '{s}': {e}")))
        })
        .transpose()?;

    Ok(PublicationDraft {
        id: Some(resource.id),
        title: attrs.title,
        description: attrs.description,
        tags: attrs.tags,
        doi: attrs.doi,
        original_publication_date,
        license: resource.relationships.license(),
        license_record: attrs.license_record,
        subjects: attrs
            .subjects
            .iter()
            .map(|path| path.iter().filter_map(subject_id).collect())
            .collect(),
        primary_file: resource.relationships.primary_file(),
        container_id: Relationships::id_of(resource.relationships.node.as_ref()),
        provider_id: Relationships::id_of(resource.relationships.provider.as_ref()),
        is_published: attrs.is_published,
        reviews_state: attrs.reviews_state.unwrap_or_default(),
    })
}

fn into_container(resource: Resource<NodeAttributes>) -> Container {
    let attrs = resource.attributes;
    Container {
        license: resource.relationships.license(),
        parent_id: Relationships::id_of(resource.relationships.parent.as_ref()),
        id: resource.id,
        title: attrs.title,
        description: attrs.description,
        tags: attrs.tags,
        license_record: attrs.node_license,
        public: attrs.public,
        registration: attrs.registration,
        current_user_permissions: attrs.current_user_permissions,
    }
}

fn into_contributor(resource: Resource<ContributorAttributes>) -> Contributor {
    Contributor {
        id: resource.id,
        full_name: resource.attributes.full_name.unwrap_or_default(),
        email: resource.attributes.email,
        bibliographic: resource.attributes.bibliographic,
    }
}

fn page_query(page: u32) -> Vec<(&'static str, String)> {
    vec![("page", page.to_string())]
}

#[async_trait]
impl RecordStore for HttpRecordStore {
    async fn find_providers(&self) -> Result<Vec<Provider>> {
        let (resources, _) = self
            .get_page::<ProviderAttributes>("/preprint_providers/", &[])
            .await?;

        Ok(resources
            .into_iter()
            .map(|r| Provider {
                id: r.id,
                name: r.attributes.name,
                moderation: ModerationWorkflow::from_wire(r.attributes.reviews_workflow.as_deref()),
                document_type: r
                    .attributes
                    .preprint_word
                    .unwrap_or_else(|| "preprint".to_string()),
                domain: r.attributes.domain.filter(|d| !d.is_empty()),
                domain_redirect_enabled: r.attributes.domain_redirect_enabled,
            })
            .collect())
    }

    async fn acceptable_licenses(&self, provider_id: &str, page: u32) -> Result<Page<License>> {
        let path = format!(
            "/preprint_providers/{}/licenses/",
            urlencoding::encode(provider_id)
        );
        let mut query = page_query(page);
        query.push(("page[size]", LICENSE_PAGE_SIZE.to_string()));
        let (resources, next) = self.get_page::<LicenseAttributes>(&path, &query).await?;

        Ok(Page {
            items: resources
                .into_iter()
                .map(|r| License {
                    id: r.id,
                    name: r.attributes.name,
                    required_fields: r.attributes.required_fields,
                })
                .collect(),
            next,
        })
    }

    async fn top_level_subjects(&self, provider_id: &str, page: u32) -> Result<Page<Subject>> {
        let path = format!(
            "/preprint_providers/{}/taxonomies/",
            urlencoding::encode(provider_id)
        );
        let mut query = page_query(page);
        query.push(("filter[parents]", "null".to_string()));
        let (resources, next) = self.get_page::<SubjectAttributes>(&path, &query).await?;

        Ok(Page {
            items: resources
                .into_iter()
                .map(|r| Subject {
                    id: r.id,
                    text: r.attributes.text,
                })
                .collect(),
            next,
        })
    }

    async fn create_draft(&self, draft: &PublicationDraft) -> Result<PublicationDraft> {
        debug!(container = ?draft.container_id, "creating draft");
        let resource = self
            .write(self.client.post(self.api("/preprints/")), &draft_body(draft))
            .await?;
        into_draft(resource)
    }

    async fn save_draft(&self, draft: &PublicationDraft) -> Result<PublicationDraft> {
        let id = draft
            .id
            .as_deref()
            .ok_or_else(|| Error::Internal("cannot save a draft without an id".to_string()))?;
        debug!(draft = id, "saving draft");
        let url = self.api(&format!("/preprints/{}/", urlencoding::encode(id)));
        let resource = self.write(self.client.patch(url), &draft_body(draft)).await?;
        into_draft(resource)
    }

    async fn reload_draft(&self, draft_id: &str) -> Result<PublicationDraft> {
        let resource = self
            .get_one(&format!("/preprints/{}/", urlencoding::encode(draft_id)))
            .await?;
        into_draft(resource)
    }

    async fn destroy_draft(&self, draft_id: &str) -> Result<()> {
        let url = self.api(&format!("/preprints/{}/", urlencoding::encode(draft_id)));
        self.send(self.client.delete(url)).await?;
        Ok(())
    }

    async fn find_container(&self, container_id: &str) -> Result<Container> {
        let resource = self
            .get_one(&format!("/nodes/{}/", urlencoding::encode(container_id)))
            .await?;
        Ok(into_container(resource))
    }

    async fn create_container(&self, title: &str) -> Result<Container> {
        let body = json!({
            "data": { "type": "nodes", "attributes": { "title": title, "category": "project" } }
        });
        let resource = self
            .write(self.client.post(self.api("/nodes/")), &body)
            .await?;
        Ok(into_container(resource))
    }

    async fn create_child_container(&self, parent_id: &str, title: &str) -> Result<Container> {
        let body = json!({
            "data": { "type": "nodes", "attributes": { "title": title, "category": "" } }
        });
        let url = self.api(&format!("/nodes/{}/children/", urlencoding::encode(parent_id)));
        let resource = self.write(self.client.post(url), &body).await?;
        let mut child = into_container(resource);
        child.parent_id.get_or_insert_with(|| parent_id.to_string());
        Ok(child)
    }

    async fn save_container(&self, container: &Container) -> Result<Container> {
        debug!(container = %container.id, "saving container");
        let url = self.api(&format!("/nodes/{}/", urlencoding::encode(&container.id)));
        let resource = self
            .write(self.client.patch(url), &container_body(container))
            .await?;
        Ok(into_container(resource))
    }

    async fn container_drafts(&self, container_id: &str) -> Result<Vec<PublicationDraft>> {
        let path = format!("/nodes/{}/preprints/", urlencoding::encode(container_id));
        let (resources, _) = self.get_page::<DraftAttributes>(&path, &[]).await?;
        resources.into_iter().map(into_draft).collect()
    }

    async fn container_contributors(
        &self,
        container_id: &str,
        page: u32,
    ) -> Result<Page<Contributor>> {
        let path = format!("/nodes/{}/contributors/", urlencoding::encode(container_id));
        let (resources, next) = self
            .get_page::<ContributorAttributes>(&path, &page_query(page))
            .await?;
        Ok(Page {
            items: resources.into_iter().map(into_contributor).collect(),
            next,
        })
    }

    async fn add_contributor(
        &self,
        container_id: &str,
        contributor: &NewContributor,
    ) -> Result<Contributor> {
        let body = match contributor {
            NewContributor::Registered { user_id } => json!({
                "data": {
                    "type": "contributors",
                    "attributes": { "bibliographic": true, "permission": "write" },
                    "relationships": { "users": { "data": { "type": "users", "id": user_id } } },
                }
            }),
            NewContributor::Unregistered { full_name, email } => json!({
                "data": {
                    "type": "contributors",
                    "attributes": {
                        "bibliographic": true,
                        "permission": "write",
                        "full_name": full_name,
                        "email": email,
                    },
                }
            }),
        };
        let url = self.api(&format!("/nodes/{}/contributors/", urlencoding::encode(container_id)));
        let resource = self.write(self.client.post(url), &body).await?;
        Ok(into_contributor(resource))
    }

    async fn remove_contributor(&self, container_id: &str, contributor_id: &str) -> Result<()> {
        let url = self.api(&format!(
            "/nodes/{}/contributors/{}/",
            urlencoding::encode(container_id),
            urlencoding::encode(contributor_id)
        ));
        self.send(self.client.delete(url)).await?;
        Ok(())
    }

    async fn user_containers(&self, page: u32) -> Result<Page<Container>> {
        let (resources, next) = self
            .get_page::<NodeAttributes>("/users/me/nodes/", &page_query(page))
            .await?;
        Ok(Page {
            items: resources.into_iter().map(into_container).collect(),
            next,
        })
    }

    async fn search_users(&self, query: &str, page: u32) -> Result<Page<User>> {
        let mut params = page_query(page);
        params.push((
            "filter[full_name,given_name,middle_names,family_name]",
            query.to_string(),
        ));
        let (resources, next) = self.get_page::<UserAttributes>("/users/", &params).await?;
        Ok(Page {
            items: resources
                .into_iter()
                .map(|r| User {
                    id: r.id,
                    full_name: r.attributes.full_name,
                })
                .collect(),
            next,
        })
    }

    async fn save_review_action(&self, action: &ReviewAction) -> Result<ReviewAction> {
        debug!(target_draft = %action.target_id, "saving review action");
        let body = json!({
            "data": {
                "type": "review_actions",
                "attributes": { "trigger": action.trigger },
                "relationships": { "target": relation("preprints", Some(&action.target_id)) },
            }
        });
        let resource: Resource<Value> = self
            .write(self.client.post(self.api("/actions/reviews/")), &body)
            .await?;
        Ok(ReviewAction {
            id: Some(resource.id),
            ..action.clone()
        })
    }

    async fn save_withdrawal_request(&self, request: &WithdrawalRequest) -> Result<()> {
        let body = json!({
            "data": {
                "type": "preprint_requests",
                "attributes": { "comment": request.comment, "request_type": "withdrawal" },
                "relationships": { "target": relation("preprints", Some(&request.target_id)) },
            }
        });
        let url = self.api(&format!(
            "/preprints/{}/requests/",
            urlencoding::encode(&request.target_id)
        ));
        self.send(self.client.post(url).json(&body)).await?;
        Ok(())
    }
}

#[async_trait]
impl FileTransfer for HttpRecordStore {
    async fn upload(&self, container_id: &str, name: &str, bytes: Vec<u8>) -> Result<FileRef> {
        let url = format!(
            "{}/v1/resources/{}/providers/osfstorage/",
            self.files_url,
            urlencoding::encode(container_id)
        );
        let request = self
            .client
            .put(url)
            .query(&[("kind", "file"), ("name", name)])
            .body(bytes);
        let doc: Document<Resource<FileAttributes>> = self.send(request).await?.json().await?;
        Ok(FileRef {
            id: doc.data.id,
            name: doc.data.attributes.name,
        })
    }

    async fn copy(&self, file: &FileRef, destination_container_id: &str) -> Result<FileRef> {
        let url = format!(
            "{}/v1/files/{}/",
            self.files_url,
            urlencoding::encode(&file.id)
        );
        let body = json!({
            "action": "copy",
            "path": "/",
            "provider": "osfstorage",
            "resource": destination_container_id,
        });
        let doc: Document<Resource<FileAttributes>> =
            self.send(self.client.post(url).json(&body)).await?.json().await?;
        Ok(FileRef {
            id: doc.data.id,
            name: doc.data.attributes.name,
        })
    }
}
