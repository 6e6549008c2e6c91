//! FastAPI project skeleton

use super::python::{self, TestBodies};
use crate::request::{Feature, ScaffoldRequest};
use crate::runtime::invoker::FollowUpCommand;
use crate::templates::registry::{Layer, StackBlueprint, TemplateSpec};
use std::path::Path;

const MAIN_PY: &str = r#"from fastapi import FastAPI

from .routes import router

app = FastAPI()

app.include_router(router)


@app.get("/")
def read_root():
    return {"message": "Hello, World!"}
"#;

const MODELS_PY: &str = r#"from typing import Optional

from pydantic import BaseModel


class Item(BaseModel):
    name: str
    description: Optional[str] = None
    price: float
    tax: Optional[float] = None
"#;

const SCHEMAS_PY: &str = r#"from typing import Optional

from pydantic import BaseModel


class ItemSchema(BaseModel):
    name: str
    description: Optional[str] = None
    price: float
    tax: Optional[float] = None
"#;

const ROUTES_PY: &str = r#"from fastapi import APIRouter

from .schemas import ItemSchema

router = APIRouter()


@router.post("/items/")
def create_item(item: ItemSchema):
    return {"message": "Item created", "item": item}


@router.get("/items/{item_id}")
def get_item(item_id: int):
    return {"message": "Get item", "item_id": item_id}
"#;

const REQUIREMENTS_TXT: &str = r#"fastapi
fastapi[standard]
uvicorn[standard]
"#;

const DOCKERFILE: &str = r#"FROM tiangolo/uvicorn-gunicorn-fastapi:python3.11

COPY requirements.txt /tmp/requirements.txt
RUN pip install -r /tmp/requirements.txt

COPY ./app /app/app
"#;

const PYTEST_TEST: &str = r#"from fastapi.testclient import TestClient

from app.main import app

client = TestClient(app)


def test_read_root():
    response = client.get("/")
    assert response.status_code == 200
    assert response.json() == {"message": "Hello, World!"}
"#;

const UNITTEST_TEST: &str = r#"import unittest

from fastapi.testclient import TestClient

from app.main import app

client = TestClient(app)


class TestMain(unittest.TestCase):
    def test_read_root(self):
        response = client.get("/")
        self.assertEqual(response.status_code, 200)
        self.assertEqual(response.json(), {"message": "Hello, World!"})


if __name__ == "__main__":
    unittest.main()
"#;

const TESTS: TestBodies = TestBodies {
    pytest: PYTEST_TEST,
    unittest: UNITTEST_TEST,
};

pub struct FastApiBlueprint;

impl StackBlueprint for FastApiBlueprint {
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
