use galley::{
    FlowNode, InlineItem, NodeMetadata, PropertyScope, TableBody, TableCell, TableChild,
};

/// Word measure used throughout the fixtures. With the 4-unit spaces and
/// an IPD of 70, four words wrap into exactly two lines.
pub const WORD: f32 = 30.0;
pub const IPD: f32 = 70.0;
pub const LINE_HEIGHT: f32 = 14.4;

pub fn words(texts: &[&str]) -> Vec<InlineItem> {
    let mut items = Vec::new();
    for (i, text) in texts.iter().enumerate() {
        if i > 0 {
            items.push(InlineItem::space(4.0, 12.0, 2.0));
        }
        items.push(InlineItem::run(*text, WORD));
    }
    items
}

pub fn paragraph(texts: &[&str]) -> FlowNode {
    FlowNode::Paragraph {
        meta: NodeMetadata::default(),
        children: words(texts),
    }
}

pub fn paragraph_with_id(id: &str, texts: &[&str]) -> FlowNode {
    FlowNode::Paragraph {
        meta: NodeMetadata::with_id(id),
        children: words(texts),
    }
}

pub fn document(children: Vec<FlowNode>) -> FlowNode {
    FlowNode::Block {
        meta: NodeMetadata::default(),
        children,
    }
}

pub fn cell(texts: &[&str], starts_row: bool, ends_row: bool) -> TableChild {
    TableChild::Cell(
        TableCell::new(vec![paragraph(texts)])
            .starts_row(starts_row)
            .ends_row(ends_row),
    )
}

/// A table whose body still holds bare cells; `scope` is the body's saved
/// property context consumed during normalization.
pub fn table_of_cells(cells: Vec<TableChild>, scope: PropertyScope) -> FlowNode {
    let mut body = TableBody::new(NodeMetadata::default(), cells);
    body.bind(scope).expect("body scope must bind");
    FlowNode::Table {
        meta: NodeMetadata::default(),
        body: Box::new(body),
    }
}

pub fn footnote(texts: &[&str]) -> FlowNode {
    FlowNode::FootnoteBody {
        meta: NodeMetadata::default(),
        children: vec![paragraph(texts)],
    }
}
