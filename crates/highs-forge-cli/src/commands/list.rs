use highs_forge_core::preset::PresetCatalog;

pub fn render(catalog: &PresetCatalog) -> Vec<String> {
    let mut lines = vec!["Available build platforms:".to_string()];
    lines.extend(catalog.names().into_iter().map(|name| format!("  - {}", name)));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use highs_forge_core::PlatformDescriptor;

    #[test]
    fn lists_in_declaration_order() {
        let catalog = PresetCatalog::new(vec![
            PlatformDescriptor::new("windows-x64"),
            PlatformDescriptor::new("linux-x64"),
        ])
        .expect("catalog");
        assert_eq!(
            render(&catalog),
            vec!["Available build platforms:", "  - windows-x64", "  - linux-x64"]
        );
    }
}
