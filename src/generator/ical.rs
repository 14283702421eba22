use itertools::Itertools;

use super::{Emitter, encode_param_value, fold_line};
use crate::{
    component::{ComponentRef, Document},
    parser::ContentLine,
    property::Property,
};

impl Emitter for ContentLine {
    fn generate(&self) -> String {
        let mut line = self.name.clone();
        for param in self.params.iter() {
            line.push(crate::PARAM_DELIMITER);
            line.push_str(&param.name);
            line.push(crate::PARAM_NAME_DELIMITER);
            line.push_str(
                &param
                    .values
                    .iter()
                    .map(|value| encode_param_value(value))
                    .join(&crate::PARAM_VALUE_DELIMITER.to_string()),
            );
        }
        line.push(crate::VALUE_DELIMITER);
        line.push_str(&self.value);
        fold_line(&line)
    }
}

impl Emitter for Property {
    fn generate(&self) -> String {
        ContentLine::from(self).generate()
    }
}

enum Step<'a> {
    Begin(ComponentRef<'a>),
    End(&'a str),
}

impl Emitter for ComponentRef<'_> {
    fn generate(&self) -> String {
        let mut text = String::new();
        let mut steps = vec![Step::Begin(*self)];
        while let Some(step) = steps.pop() {
            match step {
                Step::Begin(component) => {
                    let name = component.name();
                    text += &fold_line(&format!("BEGIN:{name}"));
                    text += &component.properties().generate();
                    steps.push(Step::End(name));
                    steps.extend(component.children().rev().map(Step::Begin));
                }
                Step::End(name) => text += &fold_line(&format!("END:{name}")),
            }
        }
        text
    }
}

impl Emitter for Document {
    fn generate(&self) -> String {
        self.root().generate()
    }
}
