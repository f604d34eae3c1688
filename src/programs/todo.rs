use serde::{Deserialize, Serialize};

use crate::{
    error::ProgramError,
    ledger::{find_program_address, InstructionContext},
    models::{Address, ProgramId, TodoAccount, UserProfile},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "instruction", rename_all = "snake_case")]
pub enum TodoInstruction {
    InitUserProfile,
    AddTask { task: String },
    MarkTaskAsDone { todo_index: u8 },
    RemoveTask { todo_index: u8 },
}

impl TodoInstruction {
    pub fn name(&self) -> &'static str {
        match self {
            TodoInstruction::InitUserProfile => "InitUserProfile",
            TodoInstruction::AddTask { .. } => "AddTask",
            TodoInstruction::MarkTaskAsDone { .. } => "MarkTaskAsDone",
            TodoInstruction::RemoveTask { .. } => "RemoveTask",
        }
    }
}

pub fn process(
    ctx: &mut InstructionContext,
    instruction: &TodoInstruction,
) -> Result<(), ProgramError> {
    match instruction {
        TodoInstruction::InitUserProfile => init_user_profile(ctx).map(|_| ()),
        TodoInstruction::AddTask { task } => add_task(ctx, task).map(|_| ()),
        TodoInstruction::MarkTaskAsDone { todo_index } => mark_task_as_done(ctx, *todo_index),
        TodoInstruction::RemoveTask { todo_index } => remove_task(ctx, *todo_index),
    }
}

pub fn user_profile_address(owner: &Address) -> Address {
    find_program_address(&[b"user_profile", owner.as_ref()], ProgramId::Todo).0
}

pub fn todo_address(owner: &Address, index: u8) -> Address {
    find_program_address(&[b"todo_account", owner.as_ref(), &[index]], ProgramId::Todo).0
}

pub fn init_user_profile(ctx: &mut InstructionContext) -> Result<Address, ProgramError> {
    let owner = ctx.signer();
    let address = user_profile_address(&owner);
    ctx.create(address, UserProfile::new(owner))?;
    ctx.log(format!("Program log: Profile {} created", address));
    Ok(address)
}

/// Load the signer's profile
fn load_own_profile(ctx: &InstructionContext) -> Result<(Address, UserProfile), ProgramError> {
    let owner = ctx.signer();
    let address = user_profile_address(&owner);
    let profile = ctx.load::<UserProfile>(&address)?;
    if profile.owner != owner {
        return Err(ProgramError::Unauthorized(profile.owner));
    }
    Ok((address, profile))
}

/// Load one of the signer's todos
fn load_own_todo(
    ctx: &InstructionContext,
    todo_index: u8,
) -> Result<(Address, TodoAccount), ProgramError> {
    let owner = ctx.signer();
    let address = todo_address(&owner, todo_index);
    let todo = ctx.load::<TodoAccount>(&address)?;
    if todo.owner != owner {
        return Err(ProgramError::Unauthorized(todo.owner));
    }
    Ok((address, todo))
}

pub fn add_task(ctx: &mut InstructionContext, task: &str) -> Result<Address, ProgramError> {
    let task = task.trim();
    if task.is_empty() {
        return Err(ProgramError::EmptyTask);
    }
    let max = ctx.config().todo_max_task_len;
    if task.len() > max {
        return Err(ProgramError::TaskTooLong { max });
    }

    let (profile_address, mut profile) = load_own_profile(ctx)?;
    let index = profile.last_todo;
    let next = index
        .checked_add(1)
        .ok_or(ProgramError::TodoLimitReached)?;

    let address = todo_address(&profile.owner, index);
    ctx.create(
        address,
        TodoAccount {
            owner: profile.owner,
            index,
            todo: task.to_string(),
            done: false,
        },
    )?;

    profile.last_todo = next;
    profile.todo_count = profile
        .todo_count
        .checked_add(1)
        .ok_or(ProgramError::TodoLimitReached)?;
    ctx.store(profile_address, profile)?;

    ctx.log(format!("Program log: Task {} added", index));
    Ok(address)
}

/// Mark task as done
pub fn mark_task_as_done(ctx: &mut InstructionContext, todo_index: u8) -> Result<(), ProgramError> {
    let (address, mut todo) = load_own_todo(ctx, todo_index)?;
    if todo.done {
        return Err(ProgramError::TaskAlreadyDone);
    }

    todo.done = true;
    ctx.store(address, todo)?;
    ctx.log(format!("Program log: Task {} done", todo_index));
    Ok(())
}

pub fn remove_task(ctx: &mut InstructionContext, todo_index: u8) -> Result<(), ProgramError> {
    let (profile_address, mut profile) = load_own_profile(ctx)?;
    let (address, _) = load_own_todo(ctx, todo_index)?;

    ctx.close::<TodoAccount>(address)?;
    profile.todo_count = profile.todo_count.saturating_sub(1);
    ctx.store(profile_address, profile)?;

    ctx.log(format!("Program log: Task {} removed", todo_index));
    Ok(())
}
