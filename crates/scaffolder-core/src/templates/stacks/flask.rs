//! Flask project skeleton

use super::python::{self, TestBodies};
use crate::request::{Feature, ScaffoldRequest};
use crate::runtime::invoker::FollowUpCommand;
use crate::templates::registry::{Layer, StackBlueprint, TemplateSpec};
use std::path::Path;

const MAIN_PY: &str = r#"from flask import Flask, jsonify

from .routes import bp

app = Flask(__name__)
app.register_blueprint(bp)


@app.route("/")
def index():
    return jsonify({"message": "Hello, World!"})


if __name__ == "__main__":
    app.run(debug=True)
"#;

const MODELS_PY: &str = r#"class Item:
    def __init__(self, name, description, price, tax=None):
        self.name = name
        self.description = description
        self.price = price
        self.tax = tax
"#;

const SCHEMAS_PY: &str = r#"class ItemSchema:
    def __init__(self, name, description, price, tax=None):
        self.name = name
        self.description = description
        self.price = price
        self.tax = tax
"#;

const ROUTES_PY: &str = r#"from flask import Blueprint, jsonify, request

from .schemas import ItemSchema

bp = Blueprint("routes", __name__)


@bp.route("/items", methods=["POST"])
def create_item():
    data = request.json
    ItemSchema(**data)
    return jsonify({"message": "Item created", "item": data})


@bp.route("/items/<int:item_id>", methods=["GET"])
def get_item(item_id):
    return jsonify({"message": "Get item", "item_id": item_id})
"#;

const REQUIREMENTS_TXT: &str = "flask\n";

const DOCKERFILE: &str = r#"FROM python:3.12-slim

WORKDIR /srv

COPY requirements.txt .
RUN pip install -r requirements.txt

COPY ./app ./app

CMD ["python", "-m", "app.main"]
"#;

const PYTEST_TEST: &str = r#"import pytest

from app.main import app


@pytest.fixture
def client():
    app.config["TESTING"] = True
    with app.test_client() as client:
        yield client


def test_index(client):
    rv = client.get("/")
    assert rv.status_code == 200
    assert rv.get_json() == {"message": "Hello, World!"}
"#;

const UNITTEST_TEST: &str = r#"import unittest

from app.main import app


class TestMain(unittest.TestCase):
    def setUp(self):
        app.config["TESTING"] = True
        self.client = app.test_client()

    def test_index(self):
        rv = self.client.get("/")
        self.assertEqual(rv.status_code, 200)
        self.assertEqual(rv.get_json(), {"message": "Hello, World!"})


if __name__ == "__main__":
    unittest.main()
"#;

const TESTS: TestBodies = TestBodies {
    pytest: PYTEST_TEST,
    unittest: UNITTEST_TEST,
};

pub struct FlaskBlueprint;

impl StackBlueprint for FlaskBlueprint {
    fn base(&self, _request: &ScaffoldRequest) -> Layer {
        Layer::files([
            TemplateSpec::literal("app/__init__.py", ""),
            TemplateSpec::literal("app/main.py", MAIN_PY),
            TemplateSpec::literal("app/models.py", MODELS_PY),
            TemplateSpec::literal("app/schemas.py", SCHEMAS_PY),
            TemplateSpec::literal("app/routes.py", ROUTES_PY),
            TemplateSpec::literal(python::REQUIREMENTS, REQUIREMENTS_TXT),
            TemplateSpec::literal("Dockerfile", DOCKERFILE),
            TemplateSpec::literal(".gitignore", python::GITIGNORE),
        ])
    }

    fn feature(&self, feature: Feature, _request: &ScaffoldRequest) -> Option<Layer> {
        match feature {
            Feature::TestFramework(fw) => python::test_layer(fw, &TESTS),
            _ => None,
        }
    }

    fn commands(&self, _request: &ScaffoldRequest, _root: &Path) -> Vec<FollowUpCommand> {
        Vec::new()
    }
}
