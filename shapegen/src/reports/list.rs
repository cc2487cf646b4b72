use super::output::{Output, Report};

#[derive(Debug)]
pub struct GeneratorInfo {
    pub name: String,
    pub targets: Vec<String>,
    pub languages: Vec<String>,
}

/// The built-in generators, in registration order.
#[derive(Debug)]
pub struct ListReport {
    pub generators: Vec<GeneratorInfo>,
}

impl Report for ListReport {
    fn render(&self, out: &mut dyn Output) {
        if self.generators.is_empty() {
            out.preformatted("No generators registered");
            return;
        }
        out.section("Generators");
        for generator in &self.generators {
            out.list_item(&format!(
                "{} (languages: {}; targets: {})",
                generator.name,
                generator.languages.join(", "),
                generator.targets.join(", ")
            ));
        }
    }
}
