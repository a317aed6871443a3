// Test utility module for polycode-gen integration tests
#![allow(dead_code)]

use indoc::indoc;
use polycode_gen::{GenConfig, GenerateOptions};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const MODULE: &str = "example.com/shop";

pub const MODEL_SOURCE: &str = indoc! {r#"
    package model

    type OrderRequest struct {
        ID       string
        Quantity int
    }

    type OrderResponse struct {
        Status string
    }
"#};

pub const ORDERS_SOURCE: &str = indoc! {r#"
    package orders

    import (
        "example.com/shop/model"
        "github.com/cloudimpl/next-coder-sdk/polycode"
    )

    func CreateOrder(ctx polycode.ServiceContext, req *model.OrderRequest) (*model.OrderResponse, error) {
        return &model.OrderResponse{Status: "created"}, nil
    }

    func ShipOrder(ctx polycode.WorkflowContext, req model.OrderRequest) (model.OrderResponse, error) {
        return model.OrderResponse{Status: "shipped"}, nil
    }

    func validate(req *model.OrderRequest) bool {
        return req.ID != ""
    }
"#};

/// A throwaway Go module on disk
pub struct GoProject {
    dir: TempDir,
}

impl GoProject {
    /// Module with a `model` package and no services
    pub fn new() -> Self {
        let project = Self {
            dir: TempDir::new().expect("create temp dir"),
        };
        project.write("go.mod", &format!("module {MODULE}\n\ngo 1.22\n"));
        project.write("model/model.go", MODEL_SOURCE);
        project
    }

    /// Module with the `orders` service
    pub fn with_orders() -> Self {
        let project = Self::new();
        project.write("services/orders/orders.go", ORDERS_SOURCE);
        project
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn write(&self, relative: &str, contents: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(path, contents).expect("write fixture");
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative)).expect("read artifact")
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.path(relative).exists()
    }

    /// Options that never shell out to goimports
    pub fn options(&self) -> GenerateOptions {
        self.options_with(GenConfig::default())
    }

    pub fn options_with(&self, config: GenConfig) -> GenerateOptions {
        GenerateOptions::new(self.root()).with_config(GenConfig {
            format_imports: false,
            ..config
        })
    }
}
