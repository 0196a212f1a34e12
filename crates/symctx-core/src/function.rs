//! # Functions and Blocks
//!
//! A parsed function and its lexical block tree.
//!
//! Blocks live in a per-function arena indexed by [`BlockId`]; the root block
//! (index 0) is the function body itself. Children are kept in sibling order,
//! which matters: the resolver walks the tree depth-first and the first
//! matching inline call site wins ties.

use std::fmt;

use crate::error::{Result, SymctxError};
use crate::files::FileSpec;
use crate::symbols::make_symbol_name;
use crate::types::{Address, AddressRange, FunctionId, SymbolName};

/// Index of a block inside its function's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockId(u32);

impl BlockId
{
    /// The function body.
    pub const ROOT: BlockId = BlockId(0);

    /// Get the raw index.
    #[must_use]
    pub const fn raw(self) -> u32
    {
        self.0
    }

    fn index(self) -> usize
    {
        self.0 as usize
    }
}

impl fmt::Display for BlockId
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "#{}", self.0)
    }
}

/// A source position attached to a declaration or call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration
{
    /// File of the declaration
    pub file: FileSpec,
    /// 1-based line
    pub line: u32,
    /// 1-based column, if recorded
    pub column: Option<u16>,
}

impl Declaration
{
    /// Create a declaration.
    #[must_use]
    pub fn new(file: FileSpec, line: u32, column: Option<u16>) -> Self
    {
        Self { file, line, column }
    }

    /// Same line, and same file (basenames only when either side has no
    /// directory).
    #[must_use]
    pub fn file_and_line_equal(&self, other: &Declaration) -> bool
    {
        self.line == other.line && FileSpec::equal(&self.file, &other.file, false)
    }
}

/// Marks a block as the body of an inlined call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineFunctionInfo
{
    /// Name of the inlined function
    pub name: String,
    /// Where the call that got inlined was written
    pub call_site: Declaration,
}

/// A lexical block or inlined call inside a function.
#[derive(Debug, Clone)]
pub struct Block
{
    id: BlockId,
    parent: Option<BlockId>,
    children: Vec<BlockId>,
    ranges: Vec<AddressRange>,
    inline_info: Option<InlineFunctionInfo>,
}

impl Block
{
    /// This block's id.
    #[must_use]
    pub fn id(&self) -> BlockId
    {
        self.id
    }

    /// Enclosing block, `None` for the function body.
    #[must_use]
    pub fn parent(&self) -> Option<BlockId>
    {
        self.parent
    }

    /// Child blocks in sibling order.
    #[must_use]
    pub fn children(&self) -> &[BlockId]
    {
        &self.children
    }

    /// Address ranges covered by the block.
    #[must_use]
    pub fn ranges(&self) -> &[AddressRange]
    {
        &self.ranges
    }

    /// Range at `idx`.
    #[must_use]
    pub fn range_at(&self, idx: usize) -> Option<AddressRange>
    {
        self.ranges.get(idx).copied()
    }

    /// Start of the first range.
    #[must_use]
    pub fn start_address(&self) -> Option<Address>
    {
        self.ranges.first().map(|range| range.base)
    }

    /// Inline information when the block is an inlined call.
    #[must_use]
    pub fn inline_info(&self) -> Option<&InlineFunctionInfo>
    {
        self.inline_info.as_ref()
    }

    /// Whether any range contains `address`.
    #[must_use]
    pub fn contains(&self, address: Address) -> bool
    {
        self.ranges.iter().any(|range| range.contains(address))
    }
}

/// A parsed function with its block tree.
#[derive(Debug, Clone)]
pub struct Function
{
    id: FunctionId,
    name: SymbolName,
    range: AddressRange,
    blocks: Vec<Block>,
}

impl Function
{
    /// Create a function whose body block covers `range`.
    ///
    /// `linkage_name` may be mangled; it is demangled for display.
    pub fn new(id: FunctionId, linkage_name: impl Into<String>, range: AddressRange) -> Self
    {
        Self {
            id,
            name: make_symbol_name(linkage_name),
            range,
            blocks: vec![Block {
                id: BlockId::ROOT,
                parent: None,
                children: Vec::new(),
                ranges: vec![range],
                inline_info: None,
            }],
        }
    }

    /// Add a block under `parent`.
    ///
    /// ## Errors
    ///
    /// - [`SymctxError::UnknownBlock`] if `parent` is not part of this function
    pub fn add_block(
        &mut self,
        parent: BlockId,
        ranges: Vec<AddressRange>,
        inline_info: Option<InlineFunctionInfo>,
    ) -> Result<BlockId>
    {
        if parent.index() >= self.blocks.len() {
            return Err(SymctxError::UnknownBlock {
                function: self.id,
                block: parent,
            });
        }

        let raw = u32::try_from(self.blocks.len())
            .map_err(|_| SymctxError::InvalidArgument(format!("function {} has too many blocks", self.id)))?;
        let id = BlockId(raw);
        self.blocks.push(Block {
            id,
            parent: Some(parent),
            children: Vec::new(),
            ranges,
            inline_info,
        });
        self.blocks[parent.index()].children.push(id);
        Ok(id)
    }

    /// Function id.
    #[must_use]
    pub fn id(&self) -> FunctionId
    {
        self.id
    }

    /// Function name.
    #[must_use]
    pub fn name(&self) -> &SymbolName
    {
        &self.name
    }

    /// Address range of the body.
    #[must_use]
    pub fn range(&self) -> AddressRange
    {
        self.range
    }

    /// Whether the body covers `address`.
    #[must_use]
    pub fn contains(&self, address: Address) -> bool
    {
        self.range.contains(address)
    }

    /// Block by id.
    #[must_use]
    pub fn block(&self, id: BlockId) -> Option<&Block>
    {
        self.blocks.get(id.index())
    }

    /// The function body block.
    #[must_use]
    pub fn root_block(&self) -> &Block
    {
        &self.blocks[BlockId::ROOT.index()]
    }

    /// Every block below the root, depth-first: each child is yielded before
    /// its own descendants, and those before its next sibling.
    #[must_use]
    pub fn walk_blocks(&self) -> BlockWalk<'_>
    {
        BlockWalk {
            function: self,
            stack: vec![(BlockId::ROOT, 0)],
        }
    }

    /// Deepest block whose ranges contain `address`.
    #[must_use]
    pub fn innermost_block_containing(&self, address: Address) -> Option<BlockId>
    {
        let root = self.root_block();
        if !root.contains(address) {
            return None;
        }

        let mut current = root;
        while let Some(child) = current
            .children
            .iter()
            .filter_map(|id| self.block(*id))
            .find(|child| child.contains(address))
        {
            current = child;
        }
        Some(current.id)
    }
}

/// Iterator returned by [`Function::walk_blocks`].
#[derive(Debug)]
pub struct BlockWalk<'a>
{
    function: &'a Function,
    // (block, index of the next child to visit)
    stack: Vec<(BlockId, usize)>,
}

impl<'a> Iterator for BlockWalk<'a>
{
    type Item = &'a Block;

    fn next(&mut self) -> Option<Self::Item>
    {
        loop {
            let (parent, next_child) = self.stack.last_mut()?;
            let Some(block) = self.function.block(*parent) else {
                self.stack.pop();
                continue;
            };

            match block.children.get(*next_child) {
                Some(child_id) => {
                    *next_child += 1;
                    let child = self.function.block(*child_id)?;
                    self.stack.push((child.id, 0));
                    return Some(child);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}
