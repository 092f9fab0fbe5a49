use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use orchestrator::PipelineExecutor;
use pipeline::{
    CmsSession, ContentBackend, CreationTemplate, IconImage, IconResource, IconResourceRequest,
    IconStore, IntegrationError, MessageId, Permission, Record, ResourceId, ResourceType,
    Submission, TaxonomyKind, TaxonomyTerm,
};
use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
struct Calls(Arc<Mutex<Vec<String>>>);

impl Calls {
    fn record(&self, call: &str) {
        self.0.lock().unwrap().push(call.to_string());
    }

    fn list(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

struct FakeIcons {
    bytes: Vec<u8>,
    calls: Calls,
}

#[async_trait]
impl IconStore for FakeIcons {
    async fn fetch_icon(&self, image: &IconImage) -> Result<Vec<u8>, IntegrationError> {
        self.calls.record(&format!("fetch_icon:{}", image.name));
        Ok(self.bytes.clone())
    }
}

#[derive(Clone)]
struct FakeCms {
    calls: Calls,
    fail_at: Option<&'static str>,
    submitted: Arc<Mutex<Option<CreationTemplate>>>,
}

impl FakeCms {
    fn step(&self, call: &str) -> Result<(), IntegrationError> {
        self.calls.record(call);
        if self.fail_at == Some(call) {
            return Err(IntegrationError::Status {
                status: 500,
                body: "boom".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ContentBackend for FakeCms {
    async fn open_session(&self) -> Result<Box<dyn CmsSession>, IntegrationError> {
        self.step("open_session")?;
        Ok(Box::new(self.clone()))
    }
}

fn id(s: &str) -> ResourceId {
    ResourceId::new(s).unwrap()
}

fn term(id_: &str, vocabulary: &str, name: &str) -> TaxonomyTerm {
    TaxonomyTerm {
        id: id(id_),
        resource_type: ResourceType::new(format!("taxonomy_term--{vocabulary}")).unwrap(),
        name: name.to_string(),
    }
}

#[async_trait]
impl CmsSession for FakeCms {
    async fn upload_image(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<ResourceId, IntegrationError> {
        self.step("upload_image")?;
        assert_eq!(file_name, "icon.png");
        assert_eq!(bytes, vec![0x89, 0x50, 0x4e, 0x47]);
        Ok(id("file-1"))
    }

    async fn create_icon_resource(
        &self,
        request: &IconResourceRequest,
    ) -> Result<IconResource, IntegrationError> {
        self.step("create_icon_resource")?;
        Ok(IconResource {
            media_id: id("media-1"),
            file_id: request.data.relationships.field_media_image.data.id.clone(),
        })
    }

    async fn list_permissions(&self) -> Result<Vec<Permission>, IntegrationError> {
        self.step("list_permissions")?;
        Ok(["language", "profile", "message", "msisdn", "ozow"]
            .into_iter()
            .map(Permission::new)
            .collect())
    }

    async fn list_terms(&self, kind: TaxonomyKind) -> Result<Vec<TaxonomyTerm>, IntegrationError> {
        let call = match kind {
            TaxonomyKind::Languages => "list_terms:languages",
            TaxonomyKind::Countries => "list_terms:countries",
            TaxonomyKind::Categories => "list_terms:category",
        };
        self.step(call)?;
        Ok(match kind {
            TaxonomyKind::Languages => vec![term("l-en", "languages", "English")],
            TaxonomyKind::Countries => vec![
                term("c-za", "countries", "South Africa"),
                term("c-ke", "countries", "Kenya"),
            ],
            TaxonomyKind::Categories => vec![term("g-games", "category", "Games")],
        })
    }

    async fn create_micro_app(
        &self,
        template: &CreationTemplate,
    ) -> Result<Submission, IntegrationError> {
        self.step("create_micro_app")?;
        *self.submitted.lock().unwrap() = Some(template.clone());
        Ok(Submission {
            status: 201,
            body: json!({ "data": { "id": "node-1" } }),
        })
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

struct Harness {
    executor: PipelineExecutor,
    calls: Calls,
    submitted: Arc<Mutex<Option<CreationTemplate>>>,
}

fn harness(icon_bytes: Vec<u8>, fail_at: Option<&'static str>) -> Harness {
    let calls = Calls::default();
    let submitted = Arc::new(Mutex::new(None));
    let icons = FakeIcons {
        bytes: icon_bytes,
        calls: calls.clone(),
    };
    let cms = FakeCms {
        calls: calls.clone(),
        fail_at,
        submitted: submitted.clone(),
    };
    Harness {
        executor: PipelineExecutor::new(Arc::new(icons), Arc::new(cms)),
        calls,
        submitted,
    }
}

fn png() -> Vec<u8> {
    vec![0x89, 0x50, 0x4e, 0x47]
}

fn record(body: Value) -> Record {
    Record {
        message_id: MessageId::new("msg-1").unwrap(),
        body,
    }
}

fn valid_body() -> Value {
    json!({
        "Body": { "data": {
            "title": "Quiz Master",
            "languages": [{ "name": "[\"English\"]" }],
            "countries": [{ "name": "[\"South Africa\"]" }],
            "category": "[\"Games\"]",
            "language": true,
            "message": true,
            "msisdn": true,
            "ozow": true
        } },
        "Icon": { "Image": [{ "name": "icon.png", "url": "https://cdn.test/icon.png" }] }
    })
}

const ALL_STEPS: [&str; 9] = [
    "fetch_icon:icon.png",
    "open_session",
    "upload_image",
    "create_icon_resource",
    "list_permissions",
    "list_terms:languages",
    "list_terms:countries",
    "list_terms:category",
    "create_micro_app",
];

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn successful_run_submits_complete_template() {
    let h = harness(png(), None);

    let outcome = h.executor.handle(&record(valid_body())).await;

    assert_eq!(outcome.status, 201);
    assert!(outcome.is_created());
    assert_eq!(outcome.body["data"]["id"], "node-1");
    assert_eq!(h.calls.list(), ALL_STEPS);

    let template = h.submitted.lock().unwrap().clone().unwrap();
    let attrs = &template.data.attributes;
    assert_eq!(attrs.title.as_deref(), Some("Quiz Master"));
    assert_eq!(
        attrs.field_user_permissions,
        vec!["UserLanguage", "SendMessage", "MSISDN", "MoMoCollections"]
    );
    let rels = &template.data.relationships;
    assert_eq!(rels.field_image.data.id.as_str(), "file-1");
    assert_eq!(rels.field_media_image.data.id.as_str(), "media-1");
    assert_eq!(rels.field_countries_term.data.len(), 1);
    assert_eq!(rels.field_countries_term.data[0].id.as_str(), "c-za");
}

#[tokio::test]
async fn missing_image_fails_without_contacting_collaborators() {
    let bodies = [
        json!({ "Icon": { "Image": [{ "name": "icon.png", "url": "u" }] } }),
        json!({ "Body": { "data": { "title": "x" } } }),
        json!({ "Body": { "data": { "title": "x" } }, "Icon": {} }),
        json!({ "Body": { "data": { "title": "x" } }, "Icon": { "Image": [] } }),
    ];

    for body in bodies {
        let h = harness(png(), None);
        let outcome = h.executor.handle(&record(body)).await;
        assert_eq!(outcome.status, 500);
        assert_eq!(outcome.body["message"], "No Image or Icon to Upload");
        assert!(h.calls.list().is_empty());
    }
}

#[tokio::test]
async fn empty_icon_bytes_stop_before_authentication() {
    let h = harness(Vec::new(), None);

    let outcome = h.executor.handle(&record(valid_body())).await;

    assert_eq!(outcome.status, 500);
    assert_eq!(outcome.body["message"], "Error: Couldn't fetch Icon");
    assert_eq!(h.calls.list(), vec!["fetch_icon:icon.png"]);
}

#[tokio::test]
async fn each_failing_step_short_circuits_with_its_message() {
    let cases = [
        ("open_session", "Error: Couldn't Authenticate"),
        ("upload_image", "Error: Couldn't Upload Image"),
        ("create_icon_resource", "Error: Couldn't Get Icon ID"),
        ("list_permissions", "Error: Couldn't Load Permissions"),
        ("list_terms:languages", "Error: Couldn't Load Languages"),
        ("list_terms:countries", "Error: Couldn't Load Countries"),
        ("list_terms:category", "Error: Couldn't Load Categories"),
        ("create_micro_app", "Error: Couldn't Create Micro App"),
    ];

    for (step, message) in cases {
        let h = harness(png(), Some(step));

        let outcome = h.executor.handle(&record(valid_body())).await;

        assert_eq!(outcome.status, 500, "step {step}");
        assert_eq!(outcome.body["message"], message, "step {step}");
        let calls = h.calls.list();
        assert_eq!(calls.last().map(String::as_str), Some(step));
        let position = ALL_STEPS.iter().position(|s| *s == step).unwrap();
        assert_eq!(calls, &ALL_STEPS[..=position]);
        assert!(h.submitted.lock().unwrap().is_none());
    }
}

#[tokio::test]
async fn malformed_selection_is_never_submitted() {
    let h = harness(png(), None);
    let mut body = valid_body();
    body["Body"]["data"]["category"] = json!("Games, News");

    let outcome = h.executor.handle(&record(body)).await;

    assert_eq!(outcome.status, 500);
    assert_eq!(outcome.body["message"], "Error: Couldn't Build Micro App");
    assert!(!h.calls.list().contains(&"create_micro_app".to_string()));
    assert!(h.submitted.lock().unwrap().is_none());
}

#[tokio::test]
async fn undecodable_body_is_reported_as_invalid() {
    let h = harness(png(), None);
    let body = json!({
        "Body": { "data": { "title": "x", "languages": "English" } },
        "Icon": { "Image": [{ "name": "icon.png", "url": "https://cdn.test/icon.png" }] }
    });

    let outcome = h.executor.handle(&record(body)).await;

    assert_eq!(outcome.status, 500);
    assert_eq!(outcome.body["message"], "Error: Invalid Micro App Body");
    assert!(h.calls.list().is_empty());
}
