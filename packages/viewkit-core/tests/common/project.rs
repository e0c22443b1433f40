//! On-disk project layout builder

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// `<tmp>/.git` + `<tmp>/addons/<module>/{__manifest__.py, views/}`
pub struct TestProject {
    pub dir: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        fs::create_dir_all(dir.path().join(".git")).expect("create .git");
        fs::create_dir_all(dir.path().join("addons")).expect("create addons");
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn addons(&self) -> PathBuf {
        self.root().join("addons")
    }

    pub fn add_module(&self, name: &str) -> PathBuf {
        let module = self.addons().join(name);
        fs::create_dir_all(module.join("views")).expect("create views dir");
        fs::write(module.join("__manifest__.py"), format!("{{'name': '{}'}}\n", name))
            .expect("write manifest");
        module
    }

    pub fn write_view(&self, module: &str, file: &str, content: &str) -> PathBuf {
        let path = self.addons().join(module).join("views").join(file);
        fs::write(&path, content).expect("write view file");
        path
    }

    /// View files currently in a module, sorted
    pub fn view_files(&self, module: &str) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = fs::read_dir(self.addons().join(module).join("views"))
            .expect("read views dir")
            .map(|e| e.expect("dir entry").path())
            .collect();
        files.sort();
        files
    }

    /// Write the fixture grammars into `<tmp>/rng`
    pub fn write_schemas(&self) -> PathBuf {
        let dir = self.root().join("rng");
        fs::create_dir_all(&dir).expect("create rng dir");
        fs::write(dir.join("common.rng"), super::COMMON_RNG).expect("write common.rng");
        fs::write(dir.join("list_view.rng"), super::LIST_RNG).expect("write list_view.rng");
        dir
    }
}
